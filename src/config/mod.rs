//! Configuration: CLI handling, runtime settings and the project config file

pub mod cli;
pub mod project;
pub mod schema;
pub mod settings;

pub use cli::Cli;
pub use project::{check, config_path, increment_version, ConfigStatus, ProjectConfig};
pub use settings::Settings;

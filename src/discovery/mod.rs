//! Project discovery: directory names, song IDs and latest prints

pub mod dirname;
pub mod locator;
pub mod song_id;

pub use dirname::{initialize_from_dir_name, parse_dir_name, parse_project_dir, ParsedDirName};
pub use locator::{latest_print, PrintSource};
pub use song_id::{assign_song_id, derive_song_id};

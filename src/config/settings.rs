//! Runtime configuration settings

use std::path::{Path, PathBuf};

/// Runtime settings for a bouncer run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Project directory holding `config.ini`
    pub source_dir: PathBuf,
    /// Show progress bars
    pub show_progress: bool,
    /// Wait for Enter before exiting
    pub pause_on_exit: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            source_dir: cli
                .source_dir
                .clone()
                .unwrap_or_else(default_source_dir),
            show_progress: !cli.quiet,
            pause_on_exit: !cli.no_pause,
        }
    }

    /// Settings for a given project directory, non-interactive
    pub fn for_project(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            show_progress: false,
            pause_on_exit: false,
        }
    }
}

/// The executable lives in a scripts folder inside the project, so the
/// project is the parent of the executable's directory
pub fn default_source_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok())
        .and_then(|exe| source_dir_for_executable(&exe))
        .unwrap_or_else(|| PathBuf::from(".."))
}

fn source_dir_for_executable(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    #[test]
    fn test_source_dir_for_executable() {
        let exe = Path::new("/music/01012024_01_POP [A - T] 120 BPM C/scripts/bouncer");
        assert_eq!(
            source_dir_for_executable(exe),
            Some(PathBuf::from("/music/01012024_01_POP [A - T] 120 BPM C"))
        );
    }

    #[test]
    fn test_from_cli() {
        let cli = Cli::try_parse_from(["bouncer", "-s", "/music/song", "-q", "--no-pause"]).unwrap();
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.source_dir, PathBuf::from("/music/song"));
        assert!(!settings.show_progress);
        assert!(!settings.pause_on_exit);
    }

    #[test]
    fn test_from_cli_without_arguments_is_interactive() {
        let cli = Cli::try_parse_from(["bouncer"]).unwrap();
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.source_dir, default_source_dir());
        assert!(settings.show_progress);
        assert!(settings.pause_on_exit);
    }
}

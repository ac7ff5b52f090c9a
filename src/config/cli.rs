//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// bouncer - collect the latest prints of a music project
///
/// Exports the latest master print to the showcase directory, writes a
/// release note and assembles a versioned POST package of MP3 stems.
/// With no arguments the project directory is the parent of the folder
/// holding the executable.
#[derive(Parser, Debug)]
#[command(name = "bouncer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project (source) directory; defaults to the parent of the executable's folder
    #[arg(short, long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Exit without waiting for Enter
    #[arg(long, default_value = "false")]
    pub no_pause: bool,
}

impl Cli {
    /// Log filter directive based on the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["bouncer"]).unwrap();
        assert!(cli.source_dir.is_none());
        assert_eq!(cli.log_filter(), "info");
        assert!(!cli.no_pause);
    }

    #[test]
    fn test_verbosity_and_quiet() {
        let cli = Cli::try_parse_from(["bouncer", "-v"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");

        let cli = Cli::try_parse_from(["bouncer", "-vvv", "--quiet"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
    }

    #[test]
    fn test_source_dir() {
        let cli = Cli::try_parse_from(["bouncer", "--source-dir", "/music/song", "--no-pause"]).unwrap();
        assert_eq!(cli.source_dir, Some(PathBuf::from("/music/song")));
        assert!(cli.no_pause);
    }
}

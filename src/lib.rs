//! bouncer - latest-print collector for music projects
//!
//! A command-line utility that takes a music project directory, finds the
//! latest master and stem prints rendered by the DAW, and organizes them
//! into a showcase MP3, a versioned release note and a POST delivery package.
//!
//! # Architecture
//!
//! - `config`: CLI arguments, runtime settings and the per-project `config.ini`
//! - `discovery`: directory name parsing, song IDs and latest-print lookup
//! - `audio`: WAV decoding (symphonia) and MP3 export (LAME)
//! - `export`: showcase MP3, release notes and POST packages
//! - `prompt`: directory dialog and console acknowledgment
//! - `pipeline`: sequencing of the phases
//!
//! # Example
//!
//! ```no_run
//! use bouncer::audio::LameTranscoder;
//! use bouncer::config::Settings;
//! use bouncer::pipeline::{self, RunOutcome};
//! use bouncer::prompt::DialogPrompt;
//!
//! let settings = Settings::for_project("/music/01012024_01_POP [ARTIST - TITLE] 120 BPM Cmaj");
//! let outcome = pipeline::run(&settings, &DialogPrompt::default(), &LameTranscoder::new())
//!     .expect("Run failed");
//! if let RunOutcome::Completed(summary) = outcome {
//!     println!("Exported version {}", summary.version);
//! }
//! ```

pub mod audio;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod prompt;
pub mod types;

// Re-export key types at crate root
pub use error::{BouncerError, Result};
pub use types::{SongDetails, SongMetadata, StemType};

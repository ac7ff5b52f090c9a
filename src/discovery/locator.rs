//! Latest print lookup
//!
//! A print is a WAV file rendered by the DAW whose name starts with a stem
//! label, e.g. `DRUMS PRINT v3.wav`. Only the most recently modified print of
//! each label is used.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Consolidated clips inside an Ableton Live project
pub const CONSOLIDATE_PATH: &str = "Samples/Processed/Consolidate";
/// Recorded clips inside an Ableton Live project
pub const RECORDINGS_PATH: &str = "Samples/Recorded";

/// Extension every print carries
pub const PRINT_EXTENSION: &str = "wav";

/// Where prints are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSource {
    /// Ableton Live project root, or a plain stems folder
    pub root: PathBuf,
    /// `root` is an Ableton Live project
    pub daw_mode: bool,
    /// In DAW mode, use the Consolidate folder instead of Recorded
    pub consolidate: bool,
}

impl PrintSource {
    pub fn new(root: impl Into<PathBuf>, daw_mode: bool, consolidate: bool) -> Self {
        Self {
            root: root.into(),
            daw_mode,
            consolidate,
        }
    }

    /// Plain folder holding the prints directly
    pub fn folder(root: impl Into<PathBuf>) -> Self {
        Self::new(root, false, true)
    }

    /// Folder that is actually searched
    pub fn print_folder(&self) -> PathBuf {
        if !self.daw_mode {
            self.root.clone()
        } else if self.consolidate {
            self.root.join(CONSOLIDATE_PATH)
        } else {
            self.root.join(RECORDINGS_PATH)
        }
    }

    fn kind(&self) -> &'static str {
        if !self.daw_mode {
            "stems"
        } else if self.consolidate {
            "consolidate"
        } else {
            "recorded"
        }
    }
}

/// A matching print and its modification time
#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

/// True for `label*.wav` (extension compared case-insensitively)
fn is_print_of(file_name: &str, label: &str) -> bool {
    file_name.starts_with(label)
        && Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PRINT_EXTENSION))
}

/// Find the most recently modified print for `label`
///
/// Returns `Ok(None)` when nothing matches or the folder does not exist;
/// callers decide whether that is fatal.
pub fn latest_print(source: &PrintSource, label: &str) -> Result<Option<PathBuf>> {
    let folder = source.print_folder();

    if !folder.is_dir() {
        warn!(
            "The {} folder does not exist: {}",
            source.kind(),
            folder.display()
        );
        return Ok(None);
    }

    let mut candidates = Vec::new();
    // Symlinked prints count, with the target's modification time
    for entry in WalkDir::new(&folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_print_of(name, label) {
            continue;
        }
        let modified = entry.metadata().map_err(std::io::Error::from)?.modified()?;
        debug!("Candidate {}: {}", label, name);
        candidates.push(Candidate {
            path: entry.into_path(),
            modified,
        });
    }

    // Newest wins; equal timestamps fall back to the greater file name
    let latest = candidates
        .into_iter()
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));

    match latest {
        Some(candidate) => {
            info!(
                "The latest {} file: {}",
                label,
                candidate
                    .path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
            Ok(Some(candidate.path))
        }
        None => {
            info!(
                "No files found starting with '{}' in the {} folder {}",
                label,
                source.kind(),
                folder.display()
            );
            Ok(None)
        }
    }
}

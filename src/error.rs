//! Unified error types for bouncer
//!
//! Error strategy:
//! - Configuration and input errors (missing sections, missing master print,
//!   cancelled directory selection): fatal, the user fixes and reruns
//! - Missing stem variants are not errors, they are logged and skipped
//! - A directory name that does not match the project pattern is not an error
//!
//! Every run is all-or-nothing; nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Top-level error type for bouncer operations
#[derive(Debug, Error)]
pub enum BouncerError {
    // =========================================================================
    // Project setup errors - fix the project or config.ini and rerun
    // =========================================================================
    #[error("The source directory doesn't exist: '{0}'\n  Tip: Run bouncer from the project's scripts folder or pass --source-dir")]
    SourceDirMissing(PathBuf),

    #[error("The file {CONFIG_FILE_NAME} does not exist at '{0}'")]
    ConfigNotFound(PathBuf),

    #[error("Cannot parse '{path}': {reason}\n  Tip: Each line must be a [Section] header or a key = value pair")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("No '{section}' section found in {CONFIG_FILE_NAME}")]
    MissingSection { section: String },

    #[error("No '{key}' entry found in section '[{section}]' of {CONFIG_FILE_NAME}")]
    MissingKey { section: String, key: String },

    #[error("No {label} directory selected. Please rerun bouncer to try again")]
    SelectionCancelled { label: String },

    // =========================================================================
    // Input file errors
    // =========================================================================
    #[error("Could not copy the master track to the showcase directory: no MASTER PRINT*.wav in '{folder}'\n  Tip: Render (or consolidate) a master print in the DAW, then rerun")]
    MasterPrintMissing { folder: PathBuf },

    #[error("Release note not found: '{0}'")]
    ReleaseNoteMissing(PathBuf),

    // =========================================================================
    // Audio errors
    // =========================================================================
    #[error("Failed to decode audio file '{path}': {reason}\n  Tip: Prints must be PCM WAV files")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to encode MP3 '{path}': {reason}")]
    EncodeError { path: PathBuf, reason: String },

    // =========================================================================
    // Output errors
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bouncer operations
pub type Result<T> = std::result::Result<T, BouncerError>;

impl BouncerError {
    /// Returns true if the user can fix this by editing the project or config
    /// and rerunning, as opposed to an environment or I/O failure
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            BouncerError::SourceDirMissing(_)
                | BouncerError::ConfigNotFound(_)
                | BouncerError::ConfigParse { .. }
                | BouncerError::MissingSection { .. }
                | BouncerError::MissingKey { .. }
                | BouncerError::SelectionCancelled { .. }
                | BouncerError::MasterPrintMissing { .. }
        )
    }

    pub fn missing_section(section: impl Into<String>) -> Self {
        BouncerError::MissingSection {
            section: section.into(),
        }
    }

    pub fn missing_key(section: impl Into<String>, key: impl Into<String>) -> Self {
        BouncerError::MissingKey {
            section: section.into(),
            key: key.into(),
        }
    }

    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BouncerError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn encode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BouncerError::EncodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        BouncerError::OutputError { path, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_fixable_classification() {
        assert!(BouncerError::missing_section("Metadata").is_user_fixable());
        assert!(BouncerError::SelectionCancelled { label: "Showcase".into() }.is_user_fixable());
        assert!(!BouncerError::EncodeError {
            path: PathBuf::from("a.mp3"),
            reason: "boom".into()
        }
        .is_user_fixable());
    }

    #[test]
    fn test_output_error_permission_message() {
        let err = BouncerError::output_error(
            "/tmp/x/out.mp3",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().contains("Permission denied"));
    }
}

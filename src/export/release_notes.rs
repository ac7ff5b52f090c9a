//! Release note text files, one per version

use crate::config::ProjectConfig;
use crate::error::{BouncerError, Result};
use crate::types::{SongDetails, SongMetadata};
use std::path::{Path, PathBuf};
use tracing::info;

/// Folder inside the project that collects release notes
pub const RELEASE_NOTES_DIR: &str = "release_notes";

/// `Release Notes v{version} {date}.txt`
pub fn release_note_file_name(metadata: &SongMetadata) -> String {
    format!(
        "Release Notes v{} {}.txt",
        metadata.version, metadata.version_date
    )
}

/// Render the note body
pub fn render_release_note(metadata: &SongMetadata, details: &SongDetails) -> String {
    let mut note = String::from("Song Details:\n");
    note.push_str(&format!("Date of Version: {}\n", metadata.version_date));
    note.push_str(&format!("Artist: {}\n", details.artist));
    note.push_str(&format!("Song Name: {}\n", details.song_name));
    note.push_str(&format!("Genre Abbreviation: {}\n", details.genre_abbreviation));
    note.push_str(&format!("BPM: {}\n", details.bpm));
    note.push_str(&format!("Song Duration in Seconds: {}\n", details.duration));
    note.push_str(&format!("Sample Rate in Hertz: {}\n", metadata.sample_rate));
    note.push_str(&format!("Key Signature: {}\n", details.key));
    if details.has_non_standard_time_signature() {
        note.push_str(&format!("Time Signature: {}\n", details.time_signature));
    }
    note.push_str("Comments: \n");
    note
}

/// Write the release note for the current version into `release_notes/`
///
/// An existing note for the same version and date is overwritten.
pub fn write_release_note(source_dir: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let details = config.song_details()?;
    let metadata = config.metadata()?;

    let notes_dir = source_dir.join(RELEASE_NOTES_DIR);
    std::fs::create_dir_all(&notes_dir).map_err(|e| BouncerError::output_error(&notes_dir, e))?;

    let path = notes_dir.join(release_note_file_name(&metadata));
    std::fs::write(&path, render_release_note(&metadata, &details))
        .map_err(|e| BouncerError::output_error(&path, e))?;

    info!(
        "Song details saved to {}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(path)
}

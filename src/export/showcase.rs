//! Showcase export of the latest master print
//!
//! The showcase directory holds one MP3 per song. A new export replaces any
//! earlier file whose name contains the same song ID, artist and title,
//! unless master editions are being kept.

use crate::audio::Transcoder;
use crate::error::{BouncerError, Result};
use crate::types::{Mp3Tags, SongDetails, SongMetadata};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything needed to place a master print in the showcase directory
#[derive(Debug, Clone)]
pub struct ShowcaseExport<'a> {
    pub showcase_dir: &'a Path,
    /// Folder the master print was looked up in (for error reporting)
    pub print_folder: &'a Path,
    pub metadata: &'a SongMetadata,
    pub details: &'a SongDetails,
    /// Keep earlier showcase files of this song
    pub keep_previous: bool,
}

/// `{songID} v{version} [{artist} - {title}] {bpm} [{time sig}] {key}.mp3`
///
/// The time signature only appears when it is not 4/4.
pub fn showcase_file_name(metadata: &SongMetadata, details: &SongDetails) -> String {
    let mut parts = vec![
        metadata.song_id.clone(),
        format!("v{}", metadata.version),
        format!("[{} - {}]", details.artist, details.song_name),
        details.bpm.clone(),
    ];
    if details.has_non_standard_time_signature() {
        parts.push(details.time_signature.clone());
    }
    parts.push(details.key.clone());
    format!("{}.mp3", parts.join(" "))
}

/// True when `file_name` belongs to the same song: it contains the song ID,
/// the artist and the title
pub fn is_same_song(file_name: &str, metadata: &SongMetadata, details: &SongDetails) -> bool {
    file_name.contains(&metadata.song_id)
        && file_name.contains(&details.artist)
        && file_name.contains(&details.song_name)
}

/// Delete earlier showcase files of this song, returning what was removed
pub fn remove_previous_versions(
    showcase_dir: &Path,
    metadata: &SongMetadata,
    details: &SongDetails,
) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in std::fs::read_dir(showcase_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_same_song(name, metadata, details) {
            std::fs::remove_file(entry.path())?;
            info!("Removed previous version: {}", name);
            removed.push(entry.path());
        }
    }
    Ok(removed)
}

/// Transcode the master print into the showcase directory
///
/// A missing master aborts the export before anything is deleted.
pub fn export_master(
    master: Option<&Path>,
    export: &ShowcaseExport<'_>,
    transcoder: &dyn Transcoder,
) -> Result<PathBuf> {
    let master = master.ok_or_else(|| BouncerError::MasterPrintMissing {
        folder: export.print_folder.to_path_buf(),
    })?;

    std::fs::create_dir_all(export.showcase_dir)
        .map_err(|e| BouncerError::output_error(export.showcase_dir, e))?;

    if export.keep_previous {
        debug!("Keeping earlier master editions in the showcase directory");
    } else {
        remove_previous_versions(export.showcase_dir, export.metadata, export.details)?;
    }

    let file_name = showcase_file_name(export.metadata, export.details);
    let destination = export.showcase_dir.join(&file_name);
    info!("Adding latest master to showcase directory: {}", file_name);

    let tags = Mp3Tags {
        artist: Some(export.details.artist.clone()),
        title: Some(export.details.song_name.clone()),
    };
    transcoder.transcode(master, &destination, &tags)?;

    info!("Added latest version: {}", file_name);
    Ok(destination)
}

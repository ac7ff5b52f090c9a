//! POST packages: versioned delivery folders for clients
//!
//! Layout:
//! ```text
//! POST/
//!   [Artist-Title] v3 05-02-2024/
//!     STEMS/
//!       MASTER PRINT.mp3
//!       DRUMS PRINT.mp3
//!       ...
//!     Release Notes v3 05-02-2024.txt
//! ```

use crate::audio::Transcoder;
use crate::config::ProjectConfig;
use crate::discovery::{latest_print, PrintSource};
use crate::error::{BouncerError, Result};
use crate::types::{Mp3Tags, SongDetails, SongMetadata, StemType};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;

/// Folder inside the project holding all POST packages
pub const POST_DIR: &str = "POST";
/// Sub-folder of a package holding the MP3 stems
pub const STEMS_DIR: &str = "STEMS";

/// What went into a POST package
#[derive(Debug, Clone)]
pub struct PostReport {
    pub package_dir: PathBuf,
    /// Stems exported into `STEMS/`
    pub exported: Vec<StemType>,
    /// Stems with no print to export
    pub skipped: Vec<StemType>,
    /// Copy of the release note inside the package
    pub release_note: PathBuf,
}

/// `[{artist}-{title}] v{version} {date}`
pub fn package_dir_name(metadata: &SongMetadata, details: &SongDetails) -> String {
    format!(
        "[{}-{}] v{} {}",
        details.artist, details.song_name, metadata.version, metadata.version_date
    )
}

fn progress_bar(len: usize, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    Some(pb)
}

/// Assemble the POST package for the current version
///
/// Each stem type's latest print is transcoded into `STEMS/`; stem types
/// with no print are skipped. The release note is copied into the package
/// root. Rerunning for the same version reuses and refreshes the package.
pub fn build_post_package(
    source_dir: &Path,
    prints: &PrintSource,
    release_note: &Path,
    config: &ProjectConfig,
    transcoder: &dyn Transcoder,
    show_progress: bool,
) -> Result<PostReport> {
    let details = config.song_details()?;
    let metadata = config.metadata()?;

    if !release_note.is_file() {
        return Err(BouncerError::ReleaseNoteMissing(release_note.to_path_buf()));
    }

    let package_dir = source_dir
        .join(POST_DIR)
        .join(package_dir_name(&metadata, &details));
    let stems_dir = package_dir.join(STEMS_DIR);
    std::fs::create_dir_all(&stems_dir).map_err(|e| BouncerError::output_error(&stems_dir, e))?;

    info!("Exporting stems with the {} transcoder", transcoder.name());
    let mut exported = Vec::new();
    let mut skipped = Vec::new();
    let pb = progress_bar(StemType::ALL.len(), show_progress);

    for stem in StemType::ALL {
        if let Some(ref pb) = pb {
            pb.set_message(stem.label());
        }

        match latest_print(prints, stem.label())? {
            Some(print) => {
                let file_name = format!("{}.mp3", stem.label());
                transcoder.transcode(&print, &stems_dir.join(&file_name), &Mp3Tags::default())?;
                info!("Exported {} into {} folder", file_name, STEMS_DIR);
                exported.push(stem);
            }
            None => {
                info!("No {} to export, skipping", stem.label());
                skipped.push(stem);
            }
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Stems exported");
    }

    let note_name = release_note
        .file_name()
        .ok_or_else(|| BouncerError::ReleaseNoteMissing(release_note.to_path_buf()))?;
    let note_copy = package_dir.join(note_name);
    std::fs::copy(release_note, &note_copy).map_err(|e| BouncerError::output_error(&note_copy, e))?;
    info!("Copied {} into {} folder", note_name.to_string_lossy(), POST_DIR);

    info!(
        "POST entry for v{} dated {} has been created",
        metadata.version, metadata.version_date
    );

    Ok(PostReport {
        package_dir,
        exported,
        skipped,
        release_note: note_copy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Copies the print bytes instead of encoding
    struct CopyTranscoder;

    impl Transcoder for CopyTranscoder {
        fn transcode(&self, input: &Path, output: &Path, tags: &Mp3Tags) -> Result<()> {
            assert!(tags.is_empty(), "stems carry no tags");
            std::fs::copy(input, output)?;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "copy"
        }
    }

    fn config() -> ProjectConfig {
        let mut config = ProjectConfig::template();
        config.set("Metadata", "version", "3");
        config.set("Metadata", "songID", "01012024_01_POP");
        config.set("Metadata", "Current Date of Version", "05-02-2024");
        config.set("Song Details", "Song Name", "TITLE");
        config.set("Song Details", "Artist", "ARTIST");
        config
    }

    #[test]
    fn test_package_dir_name() {
        let config = config();
        assert_eq!(
            package_dir_name(&config.metadata().unwrap(), &config.song_details().unwrap()),
            "[ARTIST-TITLE] v3 05-02-2024"
        );
    }

    #[test]
    fn test_package_skips_missing_stems() {
        let project = TempDir::new().unwrap();
        let prints = project.path().join("prints");
        std::fs::create_dir(&prints).unwrap();
        std::fs::write(prints.join("MASTER PRINT v2.wav"), b"master").unwrap();
        std::fs::write(prints.join("DRUMS PRINT.wav"), b"drums").unwrap();
        let note = project.path().join("Release Notes v3 05-02-2024.txt");
        std::fs::write(&note, "Song Details:\n").unwrap();

        let report = build_post_package(
            project.path(),
            &PrintSource::folder(&prints),
            &note,
            &config(),
            &CopyTranscoder,
            false,
        )
        .unwrap();

        let package = project.path().join("POST").join("[ARTIST-TITLE] v3 05-02-2024");
        assert_eq!(report.package_dir, package);
        assert_eq!(report.exported, vec![StemType::Master, StemType::Drums]);
        assert_eq!(report.skipped.len(), StemType::ALL.len() - 2);
        assert!(!report.skipped.contains(&StemType::Master));

        let mut stems: Vec<String> = std::fs::read_dir(package.join("STEMS"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        stems.sort();
        assert_eq!(stems, vec!["DRUMS PRINT.mp3", "MASTER PRINT.mp3"]);
        assert_eq!(
            std::fs::read(package.join("STEMS").join("MASTER PRINT.mp3")).unwrap(),
            b"master"
        );
        assert!(package.join("Release Notes v3 05-02-2024.txt").is_file());
    }

    #[test]
    fn test_package_requires_release_note() {
        let project = TempDir::new().unwrap();
        let result = build_post_package(
            project.path(),
            &PrintSource::folder(project.path()),
            &project.path().join("missing.txt"),
            &config(),
            &CopyTranscoder,
            false,
        );
        assert!(matches!(result, Err(BouncerError::ReleaseNoteMissing(_))));
        assert!(!project.path().join("POST").exists());
    }
}

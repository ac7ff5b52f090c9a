//! Song details from the project directory name
//!
//! Projects are named `DDMMYYYY_dayID_GENRE [Artist - Title] BPM BPM Key`,
//! e.g. `01012024_01_POP [ARTIST - TITLE] 120 BPM Cmaj`.

use crate::config::schema;
use crate::config::{config_path, ProjectConfig};
use crate::error::{Result, CONFIG_FILE_NAME};
use crate::prompt::{Prompt, SHOWCASE_LABEL};
use crate::types::{sanitize_name, STANDARD_TIME_SIGNATURE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{info, warn};

static PROJECT_DIR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{8})_(\d+)_([A-Z]+)\s+\[([^\]]+)\]\s+(\d+)\s*BPM\s+([A-Za-z#][A-Za-z#\s]*?)\s*$",
    )
    .expect("project directory pattern is valid")
});

/// Song details encoded in a project directory name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDirName {
    /// `DDMMYYYY_dayID_GENRE`
    pub song_id: String,
    pub genre_abbreviation: String,
    pub artist: String,
    pub title: String,
    pub bpm: String,
    pub key: String,
}

impl ParsedDirName {
    /// Write the parsed values into the song detail and metadata sections
    ///
    /// Only fields the directory name carries are touched.
    pub fn apply_to(&self, config: &mut ProjectConfig) {
        config.set(schema::METADATA, schema::SONG_ID, self.song_id.as_str());
        config.set(schema::SONG_DETAILS, schema::ARTIST, sanitize_name(&self.artist));
        config.set(schema::SONG_DETAILS, schema::SONG_NAME, sanitize_name(&self.title));
        config.set(schema::SONG_DETAILS, schema::BPM, self.bpm.as_str());
        config.set(schema::SONG_DETAILS, schema::KEY, self.key.as_str());
        config.set(
            schema::SONG_DETAILS,
            schema::GENRE_ABBREVIATION,
            self.genre_abbreviation.as_str(),
        );
    }
}

/// Defaults for a freshly named project: 4/4, 44.1kHz, unknown duration
fn apply_new_project_defaults(config: &mut ProjectConfig) {
    config.set(
        schema::METADATA,
        schema::SAMPLE_RATE,
        schema::DEFAULT_SAMPLE_RATE.to_string(),
    );
    config.set(
        schema::SONG_DETAILS,
        schema::TIME_SIGNATURE,
        sanitize_name(STANDARD_TIME_SIGNATURE),
    );
    config.set(schema::SONG_DETAILS, schema::DURATION, schema::NOT_APPLICABLE);
}

/// Split `Artist - Title` at the first spaced dash
///
/// Without a spaced dash the bracket must hold exactly one `-`; anything
/// else cannot be split unambiguously.
fn split_artist_title(bracket: &str) -> Option<(&str, &str)> {
    let (artist, title) = match bracket.find(" - ") {
        Some(i) => (&bracket[..i], &bracket[i + 3..]),
        None if bracket.matches('-').count() == 1 => bracket.split_once('-')?,
        None => return None,
    };
    let (artist, title) = (artist.trim(), title.trim());
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some((artist, title))
}

/// Match a directory base name against the project naming pattern
pub fn parse_dir_name(name: &str) -> Option<ParsedDirName> {
    let caps = PROJECT_DIR_PATTERN.captures(name.trim())?;

    let date = &caps[1];
    let day_id = &caps[2];
    let genre = &caps[3];
    let (artist, title) = split_artist_title(&caps[4])?;

    Some(ParsedDirName {
        song_id: format!("{}_{}_{}", date, day_id, genre),
        genre_abbreviation: genre.to_string(),
        artist: artist.to_string(),
        title: title.to_string(),
        bpm: caps[5].to_string(),
        key: caps[6].trim().to_string(),
    })
}

/// Parse the base name of a project directory
pub fn parse_project_dir(source_dir: &Path) -> Option<ParsedDirName> {
    let name = source_dir.file_name()?.to_str()?;
    parse_dir_name(name)
}

/// Create `config.ini` for a project that has none yet
///
/// When the directory name matches the project pattern the config is filled
/// from it; otherwise a blank template is written. Either way the user picks
/// the showcase directory. Returns whether the name matched.
pub fn initialize_from_dir_name(source_dir: &Path, prompt: &dyn Prompt) -> Result<bool> {
    let config_file = config_path(source_dir);
    let mut config = ProjectConfig::template();

    let parsed = parse_project_dir(source_dir);
    match &parsed {
        Some(parsed) => {
            info!("Source directory name matches expected pattern. Extracting song details");
            parsed.apply_to(&mut config);
            apply_new_project_defaults(&mut config);
        }
        None => {
            warn!(
                "Source directory '{}' does not match the expected pattern: \
                 DDMMYYYY_dayID_GENRE [Artist - Title] BPM BPM Key",
                source_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            );
            info!("Generating default {}", CONFIG_FILE_NAME);
        }
    }

    let showcase_dir = prompt.select_directory(SHOWCASE_LABEL)?;
    config.set_directory(schema::SHOWCASE_DIR, Some(&showcase_dir));
    config.save(&config_file)?;

    if parsed.is_some() {
        info!(
            "Song details extracted from the source directory name have been saved to {}",
            CONFIG_FILE_NAME
        );
    } else {
        info!("Default {} has been created at {}", CONFIG_FILE_NAME, config_file.display());
    }

    Ok(parsed.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PresetPrompt;
    use tempfile::TempDir;

    #[test]
    fn test_parse_reference_name() {
        let parsed = parse_dir_name("01012024_01_POP [ARTIST - TITLE] 120 BPM Cmaj").unwrap();
        assert_eq!(parsed.song_id, "01012024_01_POP");
        assert_eq!(parsed.artist, "ARTIST");
        assert_eq!(parsed.title, "TITLE");
        assert_eq!(parsed.bpm, "120");
        assert_eq!(parsed.key, "Cmaj");
        assert_eq!(parsed.genre_abbreviation, "POP");
    }

    #[test]
    fn test_parse_spacing_variants() {
        let parsed = parse_dir_name("15032024_2_DNB [Some Artist-Long Title Here] 174BPM F# min").unwrap();
        assert_eq!(parsed.song_id, "15032024_2_DNB");
        assert_eq!(parsed.artist, "Some Artist");
        assert_eq!(parsed.title, "Long Title Here");
        assert_eq!(parsed.bpm, "174");
        assert_eq!(parsed.key, "F# min");
    }

    #[test]
    fn test_parse_hyphenated_artist() {
        let parsed = parse_dir_name("01012024_01_POP [JAY-Z - EMPIRE] 120 BPM Cmaj").unwrap();
        assert_eq!(parsed.artist, "JAY-Z");
        assert_eq!(parsed.title, "EMPIRE");

        let parsed = parse_dir_name("01012024_01_POP [A - B - C] 120 BPM Cmaj").unwrap();
        assert_eq!(parsed.artist, "A");
        assert_eq!(parsed.title, "B - C");
    }

    #[test]
    fn test_parse_rejects_ambiguous_split() {
        assert!(parse_dir_name("01012024_01_POP [JAY-Z-EMPIRE] 120 BPM Cmaj").is_none());
        assert!(parse_dir_name("01012024_01_POP [ARTIST] 120 BPM Cmaj").is_none());
        assert!(parse_dir_name("01012024_01_POP [ - TITLE] 120 BPM Cmaj").is_none());
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert!(parse_dir_name("My Project").is_none());
        assert!(parse_dir_name("0101202_01_POP [A - T] 120 BPM C").is_none());
        assert!(parse_dir_name("01012024_01_pop [A - T] 120 BPM C").is_none());
        assert!(parse_dir_name("01012024_01_POP [A - T] fast BPM C").is_none());
        assert!(parse_dir_name("01012024_01_POP A - T 120 BPM C").is_none());
    }

    #[test]
    fn test_apply_sanitizes_names() {
        let parsed = ParsedDirName {
            song_id: "01012024_01_POP".into(),
            genre_abbreviation: "POP".into(),
            artist: "AC/DC".into(),
            title: "What? Now".into(),
            bpm: "120".into(),
            key: "Amin".into(),
        };
        let mut config = ProjectConfig::template();
        parsed.apply_to(&mut config);
        let details = config.song_details().unwrap();
        assert_eq!(details.artist, "AC_DC");
        assert_eq!(details.song_name, "What_ Now");
        // Fields the name does not carry are left alone
        assert_eq!(details.time_signature, "");
        assert_eq!(config.get("Metadata", "version"), Some("0"));
    }

    #[test]
    fn test_initialize_matching_dir_writes_filled_config() {
        let root = TempDir::new().unwrap();
        let project = root.path().join("01012024_01_POP [ARTIST - TITLE] 120 BPM Cmaj");
        std::fs::create_dir(&project).unwrap();
        let prompt = PresetPrompt::new().with_answer(SHOWCASE_LABEL, root.path().join("showcase"));

        assert!(initialize_from_dir_name(&project, &prompt).unwrap());

        let config = ProjectConfig::load(&config_path(&project)).unwrap();
        assert_eq!(config.get("Metadata", "songID"), Some("01012024_01_POP"));
        assert_eq!(config.get("Song Details", "Key"), Some("Cmaj"));
        assert_eq!(config.get("Song Details", "Time Signature"), Some("4_4"));
        assert_eq!(config.get("Metadata", "Sample Rate"), Some("44100"));
        assert_eq!(
            config.directories().showcase_dir,
            Some(root.path().join("showcase"))
        );
        assert!(config.empty_required_fields().is_empty());
    }

    #[test]
    fn test_initialize_mismatch_writes_blank_template() {
        let root = TempDir::new().unwrap();
        let project = root.path().join("untitled project");
        std::fs::create_dir(&project).unwrap();
        let prompt = PresetPrompt::new().with_answer(SHOWCASE_LABEL, root.path());

        assert!(!initialize_from_dir_name(&project, &prompt).unwrap());

        let config = ProjectConfig::load(&config_path(&project)).unwrap();
        assert_eq!(config.get("Song Details", "Artist"), Some(""));
        assert_eq!(config.version(), 0);
        assert_eq!(config.directories().showcase_dir, Some(root.path().to_path_buf()));
    }

    #[test]
    fn test_initialize_cancelled_selection_writes_nothing() {
        let root = TempDir::new().unwrap();
        let prompt = PresetPrompt::new();
        assert!(initialize_from_dir_name(root.path(), &prompt).is_err());
        assert!(!config_path(root.path()).exists());
    }
}

//! Per-project `config.ini`
//!
//! The file is always read and rewritten whole. Writes go to a temp file next
//! to the target and are renamed over it, so an interrupted run never leaves
//! a half-written config behind.

use super::schema::{self, default_schema, parse_bool, NOT_APPLICABLE, OPTIONAL_SECTIONS};
use crate::error::{BouncerError, Result, CONFIG_FILE_NAME};
use crate::types::{sanitize_name, ProjectDirectories, ProjectOptions, SongDetails, SongMetadata};
use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Location of the config file inside a project directory
pub fn config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(CONFIG_FILE_NAME)
}

/// Backslashes in Windows paths are kept literally, never treated as escapes
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn write_options() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        kv_separator: " = ",
        ..WriteOption::default()
    }
}

/// Result of checking a config file before the pipeline runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigStatus {
    /// Every required field is filled in
    Ready,
    /// The user has to complete the file and rerun
    NeedsInput {
        /// `(section, key)` of every empty required field
        empty_fields: Vec<(String, String)>,
        /// Keys from the default layout that were missing and have been added
        added_keys: bool,
    },
}

/// In-memory view of a project's `config.ini`
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    ini: Ini,
}

impl ProjectConfig {
    /// Blank configuration holding every default section and key
    pub fn template() -> Self {
        let mut config = Self { ini: Ini::new() };
        config.add_missing_keys();
        config
    }

    /// Load an existing config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BouncerError::ConfigNotFound(path.to_path_buf()));
        }
        let ini = Ini::load_from_file_opt(path, parse_options()).map_err(|e| match e {
            ini::Error::Io(io) => BouncerError::Io(io),
            ini::Error::Parse(parse) => BouncerError::ConfigParse {
                path: path.to_path_buf(),
                reason: parse.to_string(),
            },
        })?;
        debug!("Loaded {}", path.display());
        Ok(Self { ini })
    }

    /// Parse config text (used for tests and in-memory edits)
    pub fn parse(text: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(text, parse_options()).map_err(|e| {
            BouncerError::ConfigParse {
                path: PathBuf::from(CONFIG_FILE_NAME),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { ini })
    }

    /// Rewrite the whole file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let temp_path = path.with_extension("ini.tmp");

        let file =
            File::create(&temp_path).map_err(|e| BouncerError::output_error(&temp_path, e))?;
        let mut writer = BufWriter::new(file);

        let written = self
            .ini
            .write_to_opt(&mut writer, write_options())
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(BouncerError::output_error(path, e));
        }
        drop(writer);

        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            BouncerError::output_error(path, e)
        })?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.ini.section(Some(section)).is_some()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    /// Value of a key, erroring when the section or key is missing
    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        let properties = self
            .ini
            .section(Some(section))
            .ok_or_else(|| BouncerError::missing_section(section))?;
        properties
            .get(key)
            .ok_or_else(|| BouncerError::missing_key(section, key))
    }

    /// Boolean option, falling back to `default` when absent or unparseable
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get(section, key) {
            Some(value) => parse_bool(value).unwrap_or_else(|| {
                warn!(
                    "'{}' in section '[{}]' is not a boolean ({:?}), using {}",
                    key, section, value, default
                );
                default
            }),
            None => default,
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.ini.with_section(Some(section)).set(key, value.into());
    }

    /// Add every section/key of the default layout the file lacks
    ///
    /// Returns true if anything was added.
    pub fn add_missing_keys(&mut self) -> bool {
        let mut added = false;
        for (section, keys) in default_schema() {
            for (key, value) in keys {
                if self.get(section, key).is_none() {
                    self.set(section, key, value);
                    added = true;
                }
            }
        }
        added
    }

    /// `(section, key)` of every empty value outside the optional sections
    pub fn empty_required_fields(&self) -> Vec<(String, String)> {
        let mut empty = Vec::new();
        for (section, properties) in self.ini.iter() {
            let Some(section) = section else { continue };
            if OPTIONAL_SECTIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(section))
            {
                continue;
            }
            for (key, value) in properties.iter() {
                if value.trim().is_empty() {
                    empty.push((section.to_string(), key.to_string()));
                }
            }
        }
        empty
    }

    /// Current version, 0 when absent or not a number
    pub fn version(&self) -> u32 {
        self.get(schema::METADATA, schema::VERSION)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn metadata(&self) -> Result<SongMetadata> {
        if !self.has_section(schema::METADATA) {
            return Err(BouncerError::missing_section(schema::METADATA));
        }
        Ok(SongMetadata {
            version: self.version(),
            song_id: self.require(schema::METADATA, schema::SONG_ID)?.to_string(),
            version_date: self
                .require(schema::METADATA, schema::VERSION_DATE)?
                .to_string(),
            sample_rate: self
                .get(schema::METADATA, schema::SAMPLE_RATE)
                .unwrap_or_default()
                .to_string(),
        })
    }

    pub fn song_details(&self) -> Result<SongDetails> {
        let section = schema::SONG_DETAILS;
        let field = |key| self.require(section, key).map(|v| v.trim().to_string());
        Ok(SongDetails {
            song_name: field(schema::SONG_NAME)?,
            artist: field(schema::ARTIST)?,
            bpm: field(schema::BPM)?,
            key: field(schema::KEY)?,
            time_signature: field(schema::TIME_SIGNATURE)?,
            duration: self
                .get(section, schema::DURATION)
                .unwrap_or(NOT_APPLICABLE)
                .to_string(),
            genre_abbreviation: self
                .get(section, schema::GENRE_ABBREVIATION)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Workflow flags, with defaults for anything missing
    pub fn options(&self) -> ProjectOptions {
        let defaults = ProjectOptions::default();
        ProjectOptions {
            use_source_dir_names: self.get_bool(
                schema::OPTIONS,
                schema::USE_SOURCE_DIR_NAMES,
                defaults.use_source_dir_names,
            ),
            save_master_editions: self.get_bool(
                schema::OPTIONS,
                schema::SAVE_MASTER_EDITIONS,
                defaults.save_master_editions,
            ),
            ableton_as_daw: self.get_bool(
                schema::OPTIONS,
                schema::ABLETON_AS_DAW,
                defaults.ableton_as_daw,
            ),
            ableton_consolidate: self.get_bool(
                schema::OPTIONS,
                schema::ABLETON_CONSOLIDATE,
                defaults.ableton_consolidate,
            ),
        }
    }

    pub fn directories(&self) -> ProjectDirectories {
        let dir = |key| {
            self.get(schema::DIRECTORIES, key)
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != NOT_APPLICABLE)
                .map(PathBuf::from)
        };
        ProjectDirectories {
            showcase_dir: dir(schema::SHOWCASE_DIR),
            source_dir: dir(schema::SOURCE_DIR),
            alp_dir: dir(schema::ALP_DIR),
            stems_dir: dir(schema::STEMS_DIR),
        }
    }

    /// Record a directory, or `N/A` when the current mode does not use it
    pub fn set_directory(&mut self, key: &str, dir: Option<&Path>) {
        let value = match dir {
            Some(dir) => dir.to_string_lossy().into_owned(),
            None => NOT_APPLICABLE.to_string(),
        };
        self.set(schema::DIRECTORIES, key, value);
    }

    /// Replace unsafe characters in artist, song name and time signature
    ///
    /// Returns true if any value changed.
    pub fn normalize_names(&mut self) -> bool {
        let mut changed = false;
        for key in [schema::ARTIST, schema::SONG_NAME, schema::TIME_SIGNATURE] {
            if let Some(value) = self.get(schema::SONG_DETAILS, key) {
                let clean = sanitize_name(value);
                if clean != value {
                    self.set(schema::SONG_DETAILS, key, clean);
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Check a config file before running the pipeline
///
/// Empty required fields are reported, and keys missing from the default
/// layout are added (and persisted) so the user can fill them in.
pub fn check(path: &Path) -> Result<ConfigStatus> {
    let mut config = ProjectConfig::load(path)?;

    info!("Checking that all fields are in {}", CONFIG_FILE_NAME);
    let empty_fields = config.empty_required_fields();
    for (section, key) in &empty_fields {
        warn!(
            "The configuration entry '{}' in section '[{}]' is empty. Please fill it out.",
            key, section
        );
    }

    let added_keys = config.add_missing_keys();
    if added_keys {
        config.save(path)?;
        warn!(
            "Missing keys were added to {}. Please fill out the empty ones.",
            CONFIG_FILE_NAME
        );
    }

    if empty_fields.is_empty() && !added_keys {
        Ok(ConfigStatus::Ready)
    } else {
        Ok(ConfigStatus::NeedsInput {
            empty_fields,
            added_keys,
        })
    }
}

/// Bump `[Metadata] version` by one and persist it
///
/// A missing or unreadable version counts as 0, so the first call yields 1.
pub fn increment_version(path: &Path) -> Result<u32> {
    let mut config = ProjectConfig::load(path)?;

    if !config.has_section(schema::SONG_DETAILS) {
        return Err(BouncerError::missing_section(schema::SONG_DETAILS));
    }

    let new_version = config.version() + 1;
    config.set(schema::METADATA, schema::VERSION, new_version.to_string());
    config.save(path)?;

    info!("Version updated to Version {} in {}", new_version, CONFIG_FILE_NAME);
    Ok(new_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FILLED: &str = "\
[Metadata]
version = 3
songID = 01012024_01_POP
Current Date of Version = 01-01-2024
Sample Rate = 44100

[Song Details]
Song Name = TITLE
Artist = ARTIST
BPM = 120
Key = Cmaj
Time Signature = 4_4
Duration = N/A
Genre Abbreviation = POP

[Options]
useSourceDirNames = false
saveMasterEditions = false
abletonAsDAW = true
abletonConsolidateFlag = true

[Directories]
showcaseDir =
sourceDir =
alpDir =
stemsDir =
";

    #[test]
    fn test_template_contains_every_default_key() {
        let config = ProjectConfig::template();
        for (section, keys) in default_schema() {
            for (key, _) in keys {
                assert!(config.get(section, key).is_some(), "{}/{}", section, key);
            }
        }
        assert_eq!(config.version(), 0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let config = ProjectConfig::parse(FILLED).unwrap();
        assert_eq!(config.get("metadata", "SONGID"), Some("01012024_01_POP"));
        assert_eq!(config.version(), 3);
    }

    #[test]
    fn test_empty_fields_skip_directories() {
        let config = ProjectConfig::parse(FILLED).unwrap();
        assert!(config.empty_required_fields().is_empty());

        let config = ProjectConfig::template();
        let empty = config.empty_required_fields();
        assert!(empty.contains(&("Song Details".to_string(), "Artist".to_string())));
        assert!(empty.iter().all(|(section, _)| section != "Directories"));
    }

    #[test]
    fn test_add_missing_keys_keeps_existing_values() {
        let mut config = ProjectConfig::parse("[Metadata]\nversion = 7\n").unwrap();
        assert!(config.add_missing_keys());
        assert_eq!(config.version(), 7);
        assert_eq!(config.get("Options", "abletonAsDAW"), Some("true"));
        assert!(!config.add_missing_keys());
    }

    #[test]
    fn test_require_reports_missing_section_and_key() {
        let config = ProjectConfig::parse("[Metadata]\nversion = 1\n").unwrap();
        assert!(matches!(
            config.song_details(),
            Err(BouncerError::MissingSection { .. })
        ));
        assert!(matches!(
            config.require("Metadata", "songID"),
            Err(BouncerError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_directories_treat_na_as_unset() {
        let mut config = ProjectConfig::parse(FILLED).unwrap();
        config.set_directory(schema::STEMS_DIR, None);
        config.set_directory(schema::ALP_DIR, Some(Path::new("/music/project")));
        let dirs = config.directories();
        assert_eq!(dirs.stems_dir, None);
        assert_eq!(dirs.alp_dir, Some(PathBuf::from("/music/project")));
        assert_eq!(config.get("Directories", "stemsDir"), Some("N/A"));
    }

    #[test]
    fn test_normalize_names() {
        let mut config = ProjectConfig::parse(FILLED).unwrap();
        config.set("Song Details", "Artist", "AC/DC");
        config.set("Song Details", "Time Signature", "7/8");
        assert!(config.normalize_names());
        let details = config.song_details().unwrap();
        assert_eq!(details.artist, "AC_DC");
        assert_eq!(details.time_signature, "7_8");
        assert!(!config.normalize_names());
    }

    #[test]
    fn test_save_and_reload_keeps_windows_paths() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        let mut config = ProjectConfig::parse(FILLED).unwrap();
        config.set("Directories", "showcaseDir", r"C:\Music\Showcase");
        config.save(&path).unwrap();

        let reloaded = ProjectConfig::load(&path).unwrap();
        assert_eq!(
            reloaded.get("Directories", "showcaseDir"),
            Some(r"C:\Music\Showcase")
        );
        assert!(!path.with_extension("ini.tmp").exists());
    }

    #[test]
    fn test_parse_keeps_quotes_and_backslashes_literal() {
        let text = "[Song Details]\n\
                    Song Name = \"Intro\" A; B\n\
                    Key = F# min\n\
                    [Directories]\n\
                    alpDir = D:\\new\\tracks\\song Project\n";
        let config = ProjectConfig::parse(text).unwrap();
        assert_eq!(config.get("Song Details", "Song Name"), Some("\"Intro\" A; B"));
        assert_eq!(config.get("Song Details", "Key"), Some("F# min"));
        assert_eq!(
            config.get("Directories", "alpDir"),
            Some(r"D:\new\tracks\song Project")
        );

        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        config.save(&path).unwrap();
        let reloaded = ProjectConfig::load(&path).unwrap();
        assert_eq!(reloaded.get("Song Details", "Key"), Some("F# min"));
        assert_eq!(
            reloaded.get("Directories", "alpDir"),
            Some(r"D:\new\tracks\song Project")
        );
    }

    #[test]
    fn test_increment_version_from_missing_field() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        std::fs::write(&path, "[Metadata]\nsongID = X\n\n[Song Details]\nArtist = A\n").unwrap();

        assert_eq!(increment_version(&path).unwrap(), 1);
        assert_eq!(increment_version(&path).unwrap(), 2);
        assert_eq!(ProjectConfig::load(&path).unwrap().version(), 2);
    }

    #[test]
    fn test_increment_version_requires_song_details() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        std::fs::write(&path, "[Metadata]\nversion = 1\n").unwrap();
        assert!(matches!(
            increment_version(&path),
            Err(BouncerError::MissingSection { .. })
        ));
    }

    #[test]
    fn test_check_reports_and_fills_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        std::fs::write(&path, FILLED.replace("abletonConsolidateFlag = true\n", "")).unwrap();

        let status = check(&path).unwrap();
        assert_eq!(
            status,
            ConfigStatus::NeedsInput {
                empty_fields: vec![],
                added_keys: true
            }
        );
        // Second check sees the completed file
        assert_eq!(check(&path).unwrap(), ConfigStatus::Ready);
    }

    #[test]
    fn test_check_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            check(&config_path(dir.path())),
            Err(BouncerError::ConfigNotFound(_))
        ));
    }
}

//! Default layout of `config.ini`
//!
//! Section and key names are written exactly as listed here; lookups are
//! case-insensitive so hand-edited files with different casing still match.

use chrono::Local;

pub const METADATA: &str = "Metadata";
pub const SONG_DETAILS: &str = "Song Details";
pub const OPTIONS: &str = "Options";
pub const DIRECTORIES: &str = "Directories";

pub const VERSION: &str = "version";
pub const SONG_ID: &str = "songID";
pub const VERSION_DATE: &str = "Current Date of Version";
pub const SAMPLE_RATE: &str = "Sample Rate";

pub const SONG_NAME: &str = "Song Name";
pub const ARTIST: &str = "Artist";
pub const BPM: &str = "BPM";
pub const KEY: &str = "Key";
pub const TIME_SIGNATURE: &str = "Time Signature";
pub const DURATION: &str = "Duration";
pub const GENRE_ABBREVIATION: &str = "Genre Abbreviation";

pub const USE_SOURCE_DIR_NAMES: &str = "useSourceDirNames";
pub const SAVE_MASTER_EDITIONS: &str = "saveMasterEditions";
pub const ABLETON_AS_DAW: &str = "abletonAsDAW";
pub const ABLETON_CONSOLIDATE: &str = "abletonConsolidateFlag";

pub const SHOWCASE_DIR: &str = "showcaseDir";
pub const SOURCE_DIR: &str = "sourceDir";
pub const ALP_DIR: &str = "alpDir";
pub const STEMS_DIR: &str = "stemsDir";

/// Placeholder written into the directory entry that the current DAW mode
/// does not use
pub const NOT_APPLICABLE: &str = "N/A";

/// Sample rate recorded for projects initialized from their directory name
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Format of `Current Date of Version`
pub const VERSION_DATE_FORMAT: &str = "%d-%m-%Y";

/// Sections whose values may stay empty
pub const OPTIONAL_SECTIONS: &[&str] = &[DIRECTORIES];

/// Today's date in the version date format
pub fn today() -> String {
    Local::now().format(VERSION_DATE_FORMAT).to_string()
}

/// Every section with its keys and default values, in file order
pub fn default_schema() -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            METADATA,
            vec![
                (VERSION, "0".to_string()),
                (SONG_ID, String::new()),
                (VERSION_DATE, today()),
                (SAMPLE_RATE, String::new()),
            ],
        ),
        (
            SONG_DETAILS,
            vec![
                (SONG_NAME, String::new()),
                (ARTIST, String::new()),
                (BPM, String::new()),
                (KEY, String::new()),
                (TIME_SIGNATURE, String::new()),
                (DURATION, NOT_APPLICABLE.to_string()),
                (GENRE_ABBREVIATION, String::new()),
            ],
        ),
        (
            OPTIONS,
            vec![
                (USE_SOURCE_DIR_NAMES, "false".to_string()),
                (SAVE_MASTER_EDITIONS, "false".to_string()),
                (ABLETON_AS_DAW, "true".to_string()),
                (ABLETON_CONSOLIDATE, "true".to_string()),
            ],
        ),
        (
            DIRECTORIES,
            vec![
                (SHOWCASE_DIR, String::new()),
                (SOURCE_DIR, String::new()),
                (ALP_DIR, String::new()),
                (STEMS_DIR, String::new()),
            ],
        ),
    ]
}

/// Parse an INI boolean the way hand-edited config files spell them
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

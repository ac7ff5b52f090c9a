//! Core data types for bouncer
//!
//! These types represent the domain model and flow through the pipeline.

use std::path::PathBuf;

// =============================================================================
// Stem types
// =============================================================================

/// Rendered print kinds, identified by their filename prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemType {
    Master,
    Effects,
    Drums,
    Keys,
    Orchestral,
    Bass,
    Fx,
    Guitar,
    Vocals,
    Synths,
    Sample,
}

impl StemType {
    /// Every stem type, in packaging order
    pub const ALL: [StemType; 11] = [
        StemType::Master,
        StemType::Effects,
        StemType::Drums,
        StemType::Keys,
        StemType::Orchestral,
        StemType::Bass,
        StemType::Fx,
        StemType::Guitar,
        StemType::Vocals,
        StemType::Synths,
        StemType::Sample,
    ];

    /// Filename prefix the DAW print carries (e.g., "DRUMS PRINT")
    pub fn label(self) -> &'static str {
        match self {
            StemType::Master => "MASTER PRINT",
            StemType::Effects => "EFFECTS PRINT",
            StemType::Drums => "DRUMS PRINT",
            StemType::Keys => "KEYS PRINT",
            StemType::Orchestral => "ORCHESTRAL PRINT",
            StemType::Bass => "BASS PRINT",
            StemType::Fx => "FX PRINT",
            StemType::Guitar => "GUITAR PRINT",
            StemType::Vocals => "VOCALS PRINT",
            StemType::Synths => "SYNTHS PRINT",
            StemType::Sample => "SAMPLE PRINT",
        }
    }
}

impl std::fmt::Display for StemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Song identity
// =============================================================================

/// Characters that cannot appear in file names (or would break the INI file)
const UNSAFE_NAME_CHARS: &[char] = &[',', '\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace filesystem-unsafe characters with underscores
///
/// "AC/DC" becomes "AC_DC", "4/4" becomes "4_4".
pub fn sanitize_name(value: &str) -> String {
    value
        .chars()
        .map(|c| if UNSAFE_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Time signature every project is assumed to be in unless stated otherwise
pub const STANDARD_TIME_SIGNATURE: &str = "4/4";

/// True when the (possibly sanitized) time signature is anything but 4/4
pub fn is_non_standard_time_signature(time_signature: &str) -> bool {
    sanitize_name(time_signature.trim()) != sanitize_name(STANDARD_TIME_SIGNATURE)
}

/// `[Song Details]` section of the project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDetails {
    pub song_name: String,
    pub artist: String,
    pub bpm: String,
    pub key: String,
    pub time_signature: String,
    pub duration: String,
    pub genre_abbreviation: String,
}

impl SongDetails {
    pub fn has_non_standard_time_signature(&self) -> bool {
        is_non_standard_time_signature(&self.time_signature)
    }
}

/// `[Metadata]` section of the project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongMetadata {
    pub version: u32,
    pub song_id: String,
    /// Date of the current version, `DD-MM-YYYY`
    pub version_date: String,
    pub sample_rate: String,
}

/// `[Options]` section of the project configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Re-read song details from the project directory name on every run
    pub use_source_dir_names: bool,
    /// Keep earlier showcase MP3s instead of replacing them
    pub save_master_editions: bool,
    /// Prints live inside an Ableton Live project (`alpDir`) rather than a
    /// plain stems folder (`stemsDir`)
    pub ableton_as_daw: bool,
    /// Take prints from the Consolidate folder rather than Recorded
    pub ableton_consolidate: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            use_source_dir_names: false,
            save_master_editions: false,
            ableton_as_daw: true,
            ableton_consolidate: true,
        }
    }
}

/// `[Directories]` section of the project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDirectories {
    pub showcase_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub alp_dir: Option<PathBuf>,
    pub stems_dir: Option<PathBuf>,
}

// =============================================================================
// Audio
// =============================================================================

/// Tags embedded into exported MP3s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mp3Tags {
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl Mp3Tags {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.title.is_none()
    }
}

/// Decoded stereo audio ready for MP3 encoding
#[derive(Debug, Clone)]
pub struct StereoBuffer {
    /// Left channel samples normalized to [-1.0, 1.0]
    pub left: Vec<f32>,
    /// Right channel samples normalized to [-1.0, 1.0]
    pub right: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl StereoBuffer {
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        let num_samples = left.len().min(right.len());
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            num_samples as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            left,
            right,
            sample_rate,
            duration,
        }
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create from interleaved samples
    pub fn from_interleaved(samples: &[f32], sample_rate: u32) -> Self {
        let num_frames = samples.len() / 2;
        let mut left = Vec::with_capacity(num_frames);
        let mut right = Vec::with_capacity(num_frames);

        for chunk in samples.chunks_exact(2) {
            left.push(chunk[0]);
            right.push(chunk[1]);
        }

        Self::new(left, right, sample_rate)
    }

    /// Channels as 16-bit PCM, clamped
    pub fn to_i16(&self) -> (Vec<i16>, Vec<i16>) {
        let convert = |s: &f32| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        (
            self.left.iter().map(convert).collect(),
            self.right.iter().map(convert).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("AC/DC"), "AC_DC");
        assert_eq!(sanitize_name("Me, Myself: I?"), "Me_ Myself_ I_");
        assert_eq!(sanitize_name("Plain Name"), "Plain Name");
    }

    #[test]
    fn test_time_signature_standard_forms() {
        assert!(!is_non_standard_time_signature("4/4"));
        assert!(!is_non_standard_time_signature("4_4"));
        assert!(is_non_standard_time_signature("7_8"));
        assert!(is_non_standard_time_signature("3/4"));
    }

    #[test]
    fn test_stem_labels_are_not_prefixes_of_each_other() {
        for a in StemType::ALL {
            for b in StemType::ALL {
                if a != b {
                    assert!(!b.label().starts_with(a.label()), "{} prefixes {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_stereo_to_i16_clamps() {
        let buffer = StereoBuffer::new(vec![0.0, 1.5], vec![-1.5, 0.5], 44100);
        let (left, right) = buffer.to_i16();
        assert_eq!(left, vec![0, i16::MAX]);
        assert_eq!(right[0], -i16::MAX);
        assert!(right[1] > 16000);
    }
}

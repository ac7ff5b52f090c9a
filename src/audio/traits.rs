//! Transcoding trait abstraction
//!
//! The pipeline only depends on [`Transcoder`], so the LAME backend can be
//! swapped out (tests use a backend that skips encoding).

use crate::error::Result;
use crate::types::Mp3Tags;
use std::path::Path;

/// WAV to MP3 backend
pub trait Transcoder {
    /// Transcode the print at `input` into an MP3 at `output`
    ///
    /// An existing file at `output` is replaced. Empty `tags` write no tag.
    fn transcode(&self, input: &Path, output: &Path, tags: &Mp3Tags) -> Result<()>;

    /// Get the name of this transcoder (for logging)
    fn name(&self) -> &'static str;
}

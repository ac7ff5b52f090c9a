//! MP3 export using LAME
//!
//! Every export uses the same fixed settings: joint stereo at 192 kbps.
//! Tags are written afterwards as ID3v2.4.

use super::decoder::{conform_sample_rate, decode_stereo};
use super::traits::Transcoder;
use crate::error::{BouncerError, Result};
use crate::types::{Mp3Tags, StereoBuffer};
use id3::{Tag, TagLike, Version};
use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, DualPcm, FlushNoGap, Quality};
use std::path::Path;
use tracing::debug;

/// Bitrate of every exported MP3
pub const MP3_BITRATE_KBPS: u32 = 192;

/// Frames handed to LAME per call (a multiple of the 1152-sample MP3 frame)
const FRAMES_PER_CHUNK: usize = 1152 * 32;

/// Room LAME needs to flush its last frames
const FLUSH_BUFFER_SIZE: usize = 7200;

/// Transcoder backed by libmp3lame
#[derive(Debug, Default, Clone, Copy)]
pub struct LameTranscoder;

impl LameTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transcoder for LameTranscoder {
    fn transcode(&self, input: &Path, output: &Path, tags: &Mp3Tags) -> Result<()> {
        let buffer = conform_sample_rate(decode_stereo(input)?);
        let mp3 = encode_mp3(&buffer, output)?;

        std::fs::write(output, &mp3).map_err(|e| BouncerError::output_error(output, e))?;

        if !tags.is_empty() {
            write_tags(output, tags)?;
        }

        debug!(
            "Encoded {} at {} kbps ({:.1}s, {} bytes)",
            output.display(),
            MP3_BITRATE_KBPS,
            buffer.duration,
            mp3.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LAME"
    }
}

fn lame_error(path: &Path, stage: &str, err: impl std::fmt::Debug) -> BouncerError {
    BouncerError::encode_error(path, format!("{}: {:?}", stage, err))
}

/// Encode a stereo buffer to an in-memory MP3 stream
fn encode_mp3(buffer: &StereoBuffer, output: &Path) -> Result<Vec<u8>> {
    let mut builder = Builder::new()
        .ok_or_else(|| BouncerError::encode_error(output, "LAME failed to initialize"))?;
    builder
        .set_num_channels(2)
        .map_err(|e| lame_error(output, "Channel setup", e))?;
    builder
        .set_sample_rate(buffer.sample_rate)
        .map_err(|e| lame_error(output, "Sample rate setup", e))?;
    builder
        .set_brate(Bitrate::Kbps192)
        .map_err(|e| lame_error(output, "Bitrate setup", e))?;
    builder
        .set_quality(Quality::Good)
        .map_err(|e| lame_error(output, "Quality setup", e))?;
    let mut encoder = builder
        .build()
        .map_err(|e| lame_error(output, "Encoder setup", e))?;

    let (left, right) = buffer.to_i16();
    let mut mp3 = Vec::new();

    for (left, right) in left.chunks(FRAMES_PER_CHUNK).zip(right.chunks(FRAMES_PER_CHUNK)) {
        mp3.reserve(max_required_buffer_size(left.len()));
        encoder
            .encode_to_vec(DualPcm { left, right }, &mut mp3)
            .map_err(|e| lame_error(output, "Encoding", e))?;
    }

    mp3.reserve(FLUSH_BUFFER_SIZE);
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3)
        .map_err(|e| lame_error(output, "Flush", e))?;

    Ok(mp3)
}

/// Write artist/title into an ID3v2.4 tag on an existing MP3
fn write_tags(path: &Path, tags: &Mp3Tags) -> Result<()> {
    let mut tag = Tag::new();
    if let Some(artist) = &tags.artist {
        tag.set_artist(artist.as_str());
    }
    if let Some(title) = &tags.title {
        tag.set_title(title.as_str());
    }
    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| BouncerError::encode_error(path, format!("Failed to write tags: {}", e)))
}

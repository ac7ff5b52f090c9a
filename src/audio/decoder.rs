//! Audio decoding using symphonia
//!
//! Prints are decoded to stereo f32 at their native sample rate. Rates an MP3
//! stream cannot carry are converted with rubato before encoding.

use crate::error::{BouncerError, Result};
use crate::types::StereoBuffer;
use rubato::{FftFixedInOut, Resampler};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace};

/// Sample rates MPEG-1, MPEG-2 and MPEG-2.5 layer III streams support
pub const MP3_SAMPLE_RATES: [u32; 9] = [
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

/// Rate used when the source rate has no MP3 equivalent
pub const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Decode a print to a stereo buffer
pub fn decode_stereo(path: &Path) -> Result<StereoBuffer> {
    let file = std::fs::File::open(path).map_err(|e| {
        BouncerError::decode_error(path, format!("Failed to open file: {}", e))
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| BouncerError::decode_error(path, format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| BouncerError::decode_error(path, "No audio tracks found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params.sample_rate.unwrap_or(FALLBACK_SAMPLE_RATE);
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);

    debug!(
        "Decoding: {} @ {}Hz, {} channels",
        path.display(),
        sample_rate,
        channels
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| {
            BouncerError::decode_error(path, format!("Failed to create decoder: {}", e))
        })?;

    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // End of stream
            }
            Err(e) => {
                return Err(BouncerError::decode_error(
                    path,
                    format!("Failed to read packet: {}", e),
                ));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                trace!("Skipping corrupted frame: {}", e);
                continue;
            }
            Err(e) => {
                return Err(BouncerError::decode_error(path, format!("Decode error: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(sample_buf.samples());
    }

    let stereo = match channels {
        1 => StereoBuffer::new(interleaved.clone(), interleaved, sample_rate),
        2 => StereoBuffer::from_interleaved(&interleaved, sample_rate),
        _ => StereoBuffer::from_interleaved(&front_pair(&interleaved, channels), sample_rate),
    };

    debug!(
        "Decoded {} frames ({:.2}s) from {}",
        stereo.len(),
        stereo.duration,
        path.display()
    );

    Ok(stereo)
}

/// Keep the front left/right pair of a multi-channel interleaved stream
fn front_pair(samples: &[f32], channels: usize) -> Vec<f32> {
    samples
        .chunks_exact(channels)
        .flat_map(|frame| [frame[0], frame[1]])
        .collect()
}

/// Make sure the buffer has a sample rate an MP3 stream can carry
pub fn conform_sample_rate(buffer: StereoBuffer) -> StereoBuffer {
    if MP3_SAMPLE_RATES.contains(&buffer.sample_rate) {
        return buffer;
    }
    debug!(
        "Resampling {}Hz to {}Hz for MP3 export",
        buffer.sample_rate, FALLBACK_SAMPLE_RATE
    );
    resample_stereo(&buffer, FALLBACK_SAMPLE_RATE)
}

/// FFT resampling of both channels through one rubato resampler
fn resample_stereo(buffer: &StereoBuffer, to_rate: u32) -> StereoBuffer {
    let from_rate = buffer.sample_rate;
    if from_rate == to_rate || buffer.is_empty() {
        return StereoBuffer::new(buffer.left.clone(), buffer.right.clone(), to_rate);
    }

    const CHUNK_SIZE: usize = 1024;

    let mut resampler =
        match FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, 2) {
            Ok(r) => r,
            Err(e) => {
                debug!("Rubato initialization failed ({}), using linear fallback", e);
                return StereoBuffer::new(
                    resample_linear(&buffer.left, from_rate, to_rate),
                    resample_linear(&buffer.right, from_rate, to_rate),
                    to_rate,
                );
            }
        };

    let frames_in = resampler.input_frames_next();
    let frames_out = resampler.output_frames_next();
    let ratio = to_rate as f64 / from_rate as f64;
    let total = buffer.len();
    let expected = (total as f64 * ratio).ceil() as usize;

    let mut left = Vec::with_capacity(expected + frames_out);
    let mut right = Vec::with_capacity(expected + frames_out);

    let mut pos = 0;
    while pos < total {
        let end = (pos + frames_in).min(total);
        let mut chunk = vec![buffer.left[pos..end].to_vec(), buffer.right[pos..end].to_vec()];
        for channel in chunk.iter_mut() {
            channel.resize(frames_in, 0.0);
        }

        match resampler.process(&chunk, None) {
            Ok(out) => {
                left.extend_from_slice(&out[0]);
                right.extend_from_slice(&out[1]);
            }
            Err(e) => {
                debug!("Rubato processing error ({}), using linear fallback for the rest", e);
                left.extend(resample_linear(&buffer.left[pos..], from_rate, to_rate));
                right.extend(resample_linear(&buffer.right[pos..], from_rate, to_rate));
                break;
            }
        }
        pos += frames_in;
    }

    // Drop the output produced by padding the final chunk
    left.truncate(expected);
    right.truncate(expected);

    StereoBuffer::new(left, right, to_rate)
}

/// Linear interpolation, used only when rubato cannot be set up
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / step) as usize;

    (0..output_len)
        .map(|i| {
            let src = i as f64 * step;
            let idx = src as usize;
            let frac = (src - idx as f64) as f32;
            match samples.get(idx + 1) {
                Some(next) => samples[idx] * (1.0 - frac) + next * frac,
                None => samples[idx.min(samples.len() - 1)],
            }
        })
        .collect()
}

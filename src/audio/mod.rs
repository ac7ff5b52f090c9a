//! Audio decoding and MP3 export

pub mod decoder;
pub mod encoder;
pub mod traits;

pub use decoder::{conform_sample_rate, decode_stereo};
pub use encoder::LameTranscoder;
pub use traits::Transcoder;

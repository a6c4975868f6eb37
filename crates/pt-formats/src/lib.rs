//! File formats for pitchtrainer.
//!
//! Decodes the pre-rendered cadence clips, encodes synthesized clips as
//! WAV, and keeps the JSON session history.

mod assets;
mod history;
mod wav_format;

pub use assets::{AssetError, CadenceLibrary};
pub use history::{HistoryError, HistoryStore};
pub use wav_format::{clip_to_wav, load_wav, write_wav};

use thiserror::Error;

/// Error type for format parsing.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid file header or magic bytes
    #[error("invalid WAV header")]
    InvalidHeader,
    /// Unexpected end of file
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Sample encoding this decoder doesn't handle
    #[error("unsupported WAV encoding: format {format}, {bits}-bit, {channels} channel(s)")]
    Unsupported { format: u16, bits: u16, channels: u16 },
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

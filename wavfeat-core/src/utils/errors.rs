use crate::io::wave::FormatCode;

/// Errors raised while parsing a RIFF/WAVE header or decoding sample bytes.
#[derive(thiserror::Error, Debug)]
pub enum WaveError {
    #[error("not a RIFF/WAVE stream: expected RIFF magic, found {0:02x?}")]
    BadRiffMagic([u8; 4]),

    #[error("not a RIFF/WAVE stream: expected WAVE magic, found {0:02x?}")]
    BadWaveMagic([u8; 4]),

    #[error("\"fmt \" chunk size {0} outside the supported range 16..=40")]
    BadFmtChunkSize(u32),

    #[error("\"data\" chunk encountered before \"fmt \" chunk")]
    DataBeforeFmt,

    #[error("unsupported format code {0:#06x}")]
    UnsupportedFormat(u16),

    #[error("unsupported bits_per_sample {bits} for format {format:?}")]
    UnsupportedSampleType { format: FormatCode, bits: u16 },

    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    #[error("operation attempted on a reader left in a failed state by a prior error")]
    BadState,
}

/// Errors raised while producing overlapping frames from a sample stream.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error(
        "destination frame length {actual} does not match the configured frame length {expected}"
    )]
    IncorrectFrameSize { expected: usize, actual: usize },

    #[error("unexpected end of input mid-sample while reading a byte-mode source")]
    UnexpectedEof,

    #[error("destination buffer of {actual} bytes is too short to hold one frame ({needed} bytes)")]
    BufferTooShort { needed: usize, actual: usize },
}

/// Errors raised by the FFT kernel.
#[derive(thiserror::Error, Debug)]
pub enum FftError {
    #[error("real and imaginary buffers have different lengths: {real} != {imag}")]
    DataSizeMismatch { real: usize, imag: usize },

    #[error("length {0} is not a power of two, or exceeds the table's maximum length")]
    InvalidSize(usize),
}

/// Errors raised by the DCT kernel.
#[derive(thiserror::Error, Debug)]
pub enum DctError {
    #[error("data length {actual} does not match the expected 2N = {expected}")]
    InvalidSize { expected: usize, actual: usize },
}

/// Errors raised by [`crate::mfcc::MfccMaker`].
#[derive(thiserror::Error, Debug)]
pub enum MfccError {
    #[error("destination frame length {actual} does not match featLength {expected}")]
    IncorrectFrameSize { expected: usize, actual: usize },

    #[error(
        "destination buffer of {actual} bytes is too short to hold one feature vector ({needed} bytes)"
    )]
    BufferTooShort { needed: usize, actual: usize },

    #[error("unexpected end of input while acquiring a frame")]
    UnexpectedEof,
}

/// The unified error type returned by every public operation in this crate.
///
/// Every stage is fatal on error: once a stage returns `Err`, it transitions
/// to a sticky failed state and every subsequent call returns the stage-local
/// `BadState`/equivalent variant rather than retrying or re-deriving state.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Wave(#[from] WaveError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Fft(#[from] FftError),

    #[error(transparent)]
    Dct(#[from] DctError),

    #[error(transparent)]
    Mfcc(#[from] MfccError),

    #[error("I/O error from upstream source: {0}")]
    Io(#[from] std::io::Error),
}

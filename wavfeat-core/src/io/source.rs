//! Source-stage polymorphism (§9, Design Notes).
//!
//! Every stage boundary in this pipeline accepts either a structured
//! upstream producer (one that knows how to hand back a frame of `T`
//! directly) or a raw byte stream whose contents are reinterpreted as `T`.
//! Rather than a runtime sum type, dispatch happens at construction time
//! through the type parameter a stage is instantiated with — the same way
//! [`WaveReader`](crate::io::wave::WaveReader) and
//! [`FrameMaker`](crate::io::frame::FrameMaker) are generic over their
//! upstream reader/source type. The compiler picks the byte-mode adapter
//! or the structured implementation at the call site; no dispatch happens
//! per read.

use std::io::Read;

use crate::io::sample::Sample;
use crate::utils::errors::{CoreError, FrameError};

/// A structured source of decoded samples of type `T`.
///
/// Mirrors [`WaveReader::read_samples`](crate::io::wave::WaveReader::read_samples):
/// fills `dst`, returns the count written, and returns `0` only on a clean
/// end of stream.
pub trait SampleSource<T> {
    fn read_samples(&mut self, dst: &mut [T]) -> Result<usize, CoreError>;
}

/// A structured source of fixed-length frames of type `T`.
///
/// Mirrors [`MfccMaker::read_frame`](crate::mfcc::MfccMaker::read_frame):
/// fills `dst` with one frame, returns `true` on success and `false` on a
/// clean end of stream.
pub trait FrameSource<T> {
    fn read_frame(&mut self, dst: &mut [T]) -> Result<bool, CoreError>;
}

/// Adapts any byte stream into a [`SampleSource<T>`] by reinterpreting
/// exact multiples of `T::WIDTH` bytes as little-endian samples.
///
/// A byte-stream source that ends mid-sample fails with
/// [`FrameError::UnexpectedEof`], matching §4.2's byte-mode contract.
pub struct ByteSampleSource<R> {
    reader: R,
}

impl<R: Read> ByteSampleSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read, T: Sample> SampleSource<T> for ByteSampleSource<R> {
    fn read_samples(&mut self, dst: &mut [T]) -> Result<usize, CoreError> {
        let mut raw = vec![0u8; dst.len() * T::WIDTH];
        let mut filled = 0usize;

        while filled < raw.len() {
            let n = self.reader.read(&mut raw[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(0);
        }
        if filled % T::WIDTH != 0 {
            return Err(FrameError::UnexpectedEof.into());
        }

        let count = filled / T::WIDTH;
        for (i, sample) in dst.iter_mut().take(count).enumerate() {
            *sample = T::from_le_bytes(&raw[i * T::WIDTH..(i + 1) * T::WIDTH]);
        }
        Ok(count)
    }
}

/// Adapts any byte stream into a [`FrameSource<T>`] by reinterpreting
/// consecutive `length * T::WIDTH`-byte chunks as frames.
///
/// Used when a pipeline stage is fed the raw little-endian output of a
/// previous stage directly (e.g. piping `frame`'s stdout into `fftr`/`mfcc`
/// on the command line) rather than composed in-process.
pub struct ByteFrameSource<R> {
    reader: R,
    length: usize,
}

impl<R: Read> ByteFrameSource<R> {
    pub fn new(reader: R, length: usize) -> Self {
        Self { reader, length }
    }
}

impl<R: Read, T: Sample> FrameSource<T> for ByteFrameSource<R> {
    fn read_frame(&mut self, dst: &mut [T]) -> Result<bool, CoreError> {
        if dst.len() != self.length {
            return Err(FrameError::IncorrectFrameSize {
                expected: self.length,
                actual: dst.len(),
            }
            .into());
        }

        let mut raw = vec![0u8; self.length * T::WIDTH];
        let mut filled = 0usize;
        while filled < raw.len() {
            let n = self.reader.read(&mut raw[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(false);
        }
        if filled != raw.len() {
            return Err(FrameError::UnexpectedEof.into());
        }

        for (i, sample) in dst.iter_mut().enumerate() {
            *sample = T::from_le_bytes(&raw[i * T::WIDTH..(i + 1) * T::WIDTH]);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn byte_sample_source_reads_f32_le() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.0, 3.5] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut src = ByteSampleSource::new(Cursor::new(bytes));
        let mut dst = [0.0f32; 3];
        let n = src.read_samples(&mut dst).unwrap();
        assert_eq!(n, 3);
        assert_eq!(dst, [1.0, -2.0, 3.5]);
    }

    #[test]
    fn byte_sample_source_partial_sample_is_error() {
        let mut src = ByteSampleSource::new(Cursor::new(vec![0u8; 3]));
        let mut dst = [0.0f32; 1];
        assert!(src.read_samples(&mut dst).is_err());
    }

    #[test]
    fn byte_frame_source_reads_whole_frames() {
        let mut bytes = Vec::new();
        for v in 0..4i16 {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut src = ByteFrameSource::new(Cursor::new(bytes), 4);
        let mut dst = [0i16; 4];
        assert!(src.read_frame(&mut dst).unwrap());
        assert_eq!(dst, [0, 1, 2, 3]);
        assert!(!src.read_frame(&mut dst).unwrap());
    }
}

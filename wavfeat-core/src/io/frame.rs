//! Fixed-length overlapping frame production over a sample stream.
//!
//! Frames are produced from a ring buffer of capacity `length`. The first
//! frame is seeded with `ceil(length / 2)` leading zero samples (Kaldi-style
//! half-frame padding) so the first real sample lands at the frame's
//! midpoint rather than its start; every frame after that advances by
//! `shift` samples. Once the upstream source is exhausted mid-frame, the
//! remainder of the ring is zero-padded and exactly one more (partially
//! real) frame is emitted before end of stream.

use crate::io::sample::Sample;
use crate::io::source::{FrameSource, SampleSource};
use crate::utils::errors::{CoreError, FrameError};

/// Frame length and shift, in samples.
#[derive(Debug, Clone, Copy)]
pub struct FrameOpts {
    pub length: usize,
    pub shift: usize,
}

impl Default for FrameOpts {
    fn default() -> Self {
        Self {
            length: 256,
            shift: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Draining,
    Eof,
}

/// Produces overlapping frames of length `opts.length` from an upstream
/// [`SampleSource<T>`], advancing by `opts.shift` samples per frame.
pub struct FrameMaker<T, Src> {
    source: Src,
    opts: FrameOpts,
    ring: Vec<T>,
    state: State,
    source_exhausted: bool,
}

impl<T: Sample, Src: SampleSource<T>> FrameMaker<T, Src> {
    pub fn new(source: Src, opts: FrameOpts) -> Self {
        Self {
            source,
            opts,
            ring: vec![T::default(); opts.length],
            state: State::Fresh,
            source_exhausted: false,
        }
    }

    pub fn frame_length(&self) -> usize {
        self.opts.length
    }

    /// Pulls up to `n` real samples from the upstream source into
    /// `self.ring[offset..offset + n]`, zero-filling any shortfall once the
    /// source reports end of stream. Returns the number of *real* samples
    /// obtained.
    fn fill(&mut self, offset: usize, n: usize) -> Result<usize, CoreError> {
        if self.source_exhausted || n == 0 {
            for slot in &mut self.ring[offset..offset + n] {
                *slot = T::default();
            }
            return Ok(0);
        }

        let got = self.source.read_samples(&mut self.ring[offset..offset + n])?;
        if got < n {
            self.source_exhausted = true;
            for slot in &mut self.ring[offset + got..offset + n] {
                *slot = T::default();
            }
        }
        Ok(got)
    }
}

impl<T: Sample, Src: SampleSource<T>> FrameSource<T> for FrameMaker<T, Src> {
    fn read_frame(&mut self, dst: &mut [T]) -> Result<bool, CoreError> {
        let length = self.opts.length;
        if dst.len() != length {
            return Err(FrameError::IncorrectFrameSize {
                expected: length,
                actual: dst.len(),
            }
            .into());
        }

        match self.state {
            State::Eof => return Ok(false),

            State::Fresh => {
                let half = length.div_ceil(2);
                for slot in &mut self.ring[..length - half] {
                    *slot = T::default();
                }
                self.fill(length - half, half)?;
                self.state = if self.source_exhausted {
                    State::Draining
                } else {
                    State::Running
                };
            }

            State::Running => {
                let shift = self.opts.shift.min(length);
                self.ring.copy_within(shift.., 0);
                self.fill(length - shift, shift)?;
                if self.source_exhausted {
                    self.state = State::Draining;
                }
            }

            State::Draining => {
                self.state = State::Eof;
                return Ok(false);
            }
        }

        dst.copy_from_slice(&self.ring);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::ByteSampleSource;
    use std::io::Cursor;

    fn samples_source(samples: &[i16]) -> ByteSampleSource<Cursor<Vec<u8>>> {
        let mut bytes = Vec::new();
        for &s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        ByteSampleSource::new(Cursor::new(bytes))
    }

    #[test]
    fn first_frame_has_half_length_leading_zeros() {
        let src = samples_source(&[1, 2, 3, 4]);
        let mut maker = FrameMaker::new(src, FrameOpts { length: 8, shift: 4 });
        let mut frame = [0i16; 8];
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn subsequent_frames_shift_by_configured_amount() {
        let src = samples_source(&(1..=20).collect::<Vec<i16>>());
        let mut maker = FrameMaker::new(src, FrameOpts { length: 8, shift: 4 });
        let mut frame = [0i16; 8];
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [0, 0, 0, 0, 1, 2, 3, 4]);
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn terminal_frame_zero_pads_and_then_stream_ends() {
        let src = samples_source(&[1, 2, 3, 4, 5]);
        let mut maker = FrameMaker::new(src, FrameOpts { length: 4, shift: 4 });
        let mut frame = [0i16; 4];
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [0, 0, 1, 2]);
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [3, 4, 5, 0]);
        assert!(!maker.read_frame(&mut frame).unwrap());
    }

    #[test]
    fn empty_source_yields_no_frames_after_initial_half_frame() {
        let src = samples_source(&[]);
        let mut maker = FrameMaker::new(src, FrameOpts { length: 4, shift: 4 });
        let mut frame = [0i16; 4];
        assert!(maker.read_frame(&mut frame).unwrap());
        assert_eq!(frame, [0, 0, 0, 0]);
        assert!(!maker.read_frame(&mut frame).unwrap());
    }

    #[test]
    fn wrong_frame_size_is_error() {
        let src = samples_source(&[1, 2, 3, 4]);
        let mut maker = FrameMaker::new(src, FrameOpts { length: 8, shift: 4 });
        let mut wrong = [0i16; 4];
        assert!(maker.read_frame(&mut wrong).is_err());
    }
}

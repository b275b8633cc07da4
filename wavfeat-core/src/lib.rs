#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! A chain of pull-driven stages, each borrowing its upstream source by
//! reference: WAVE decode, overlapping frame production, per-frame DSP,
//! feature vector emission.
//!
//! ### Stages
//!
//! - **WaveReader** ([`io::wave`]): RIFF/WAVE chunk parsing, multi-format
//!   sample decode (PCM 8/16/24/32, IEEE float32, A-law/mu-law, Extensible).
//! - **FrameMaker** ([`io::frame`]): fixed-length overlapping frames with
//!   Kaldi-style initial half-frame zero padding and terminal zero padding.
//! - **Fft / Dct** ([`dsp::fft`], [`dsp::dct`]): the shared numeric kernels.
//! - **MfccMaker** ([`mfcc`]): dither, DC removal, pre-emphasis, windowing,
//!   FFT magnitude spectrum, Mel filterbank, DCT, liftering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use wavfeat_core::io::frame::{FrameMaker, FrameOpts};
//! use wavfeat_core::io::wave::WaveReader;
//! use wavfeat_core::mfcc::{MelOpts, MfccMaker};
//!
//! let wave_bytes: &[u8] = &[]; // a RIFF/WAVE file
//! let reader = WaveReader::new(Cursor::new(wave_bytes));
//! let framer = FrameMaker::new(reader, FrameOpts::default());
//! let mut maker = MfccMaker::new(framer, MelOpts::default())?;
//!
//! let mut frame = vec![0.0f32; maker.feat_length()];
//! while maker.read_frame(&mut frame)? {
//!     // consume one feature vector
//! }
//! # Ok::<(), wavfeat_core::utils::errors::CoreError>(())
//! ```

/// WAVE decoding and overlapping-frame production.
///
/// - [`io::wave`]: RIFF/WAVE chunk parsing and multi-format sample decode.
/// - [`io::frame`]: sliding-window frame production with lookback/overlap.
/// - [`io::source`]: the frame-producer / byte-stream polymorphism shared
///   by every stage boundary in this pipeline.
pub mod io;

/// Numeric DSP kernels shared across frames.
///
/// - [`dsp::fft`]: real-input radix-2 FFT with a shared sine table.
/// - [`dsp::dct`]: type-II-style DCT via a mirrored-sequence DFT.
/// - [`dsp::window`]: analysis windows (Hanning, Hamming, Povey, ...).
/// - [`dsp::melbank`]: triangular Mel filterbank construction.
pub mod dsp;

/// The MFCC / Mel-energy feature driver: [`mfcc::MfccMaker`].
pub mod mfcc;

/// Supporting infrastructure.
///
/// - [`utils::errors`]: the error taxonomy shared by every stage.
/// - [`utils::dither`]: the deterministic Gaussian dither generator.
pub mod utils;

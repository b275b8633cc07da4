//! I/O stages: RIFF/WAVE decode and overlapping-frame production.

/// The parametric sample type `T` (`i16` or `f32`) shared by every stage.
pub mod sample;

/// RIFF/WAVE chunk parsing and multi-format sample decode.
pub mod wave;

/// Fixed-length overlapping frame production over a sample stream.
pub mod frame;

/// The frame-producer / byte-stream source polymorphism shared by every
/// stage boundary in this pipeline.
pub mod source;

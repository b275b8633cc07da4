//! Numeric DSP kernels shared across frames (§3, FFT state; §4.3-4.4).

/// Real-input radix-2 FFT with a shared sine table.
pub mod fft;

/// Type-II-style DCT via a mirrored-sequence DFT.
pub mod dct;

/// Analysis windows (Hanning, Hamming, Povey, Rectangular, Blackman).
pub mod window;

/// Triangular Mel filterbank construction.
pub mod melbank;

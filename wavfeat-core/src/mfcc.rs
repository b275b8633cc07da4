//! The MFCC / Mel-energy feature driver (§4.5).

use crate::dsp::dct::Dct;
use crate::dsp::fft::Fft;
use crate::dsp::melbank::FilterBank;
use crate::dsp::window::{self, WindowKind};
use crate::io::source::FrameSource;
use crate::utils::dither::GaussianDither;
use crate::utils::errors::{CoreError, MfccError};

/// What a [`MfccMaker`] emits per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    /// `filterbank_num_bins` log-Mel-filterbank energies.
    MelEnergy,
    /// `mfcc_order` cepstral coefficients (c0 dropped from the run, appended
    /// separately if `output_c0`).
    #[default]
    Mfcc,
}

/// Feature-extraction configuration (§3, MelOpts).
#[derive(Debug, Clone, Copy)]
pub struct MelOpts {
    pub frame_length: usize,
    pub sample_rate: u32,
    pub remove_dc_offset: bool,
    pub dither: f32,
    pub preemph_coeff: f32,
    pub liftering_coeff: f64,
    pub blackman_coeff: f64,
    pub window: WindowKind,
    pub filterbank_floor: f64,
    pub filterbank_num_bins: usize,
    pub mfcc_order: usize,
    pub output_type: OutputType,
    pub output_energy: bool,
    pub output_c0: bool,
}

impl Default for MelOpts {
    fn default() -> Self {
        Self {
            frame_length: 256,
            sample_rate: 16000,
            remove_dc_offset: true,
            dither: 1.0,
            preemph_coeff: 0.97,
            liftering_coeff: 22.0,
            blackman_coeff: 0.42,
            window: WindowKind::default(),
            filterbank_floor: 1.0,
            filterbank_num_bins: 20,
            mfcc_order: 12,
            output_type: OutputType::default(),
            output_energy: true,
            output_c0: false,
        }
    }
}

impl MelOpts {
    fn primary_count(&self) -> usize {
        match self.output_type {
            OutputType::MelEnergy => self.filterbank_num_bins,
            OutputType::Mfcc => self.mfcc_order,
        }
    }

    /// Number of `f32`s in one emitted feature vector.
    pub fn feat_length(&self) -> usize {
        self.primary_count() + self.output_c0 as usize + self.output_energy as usize
    }

    /// The FFT frame length implied by `frame_length` (§9, FFT frame length
    /// policy): doubled when already a power of two, otherwise rounded up.
    fn fft_frame_length(&self) -> usize {
        if self.frame_length.is_power_of_two() {
            self.frame_length * 2
        } else {
            self.frame_length.next_power_of_two()
        }
    }
}

/// Drives dither, DC removal, pre-emphasis, windowing, FFT magnitude
/// spectrum, Mel filterbank, DCT, and liftering over frames pulled from an
/// upstream [`FrameSource<f32>`].
pub struct MfccMaker<Fr> {
    source: Fr,
    opts: MelOpts,
    fft: Fft,
    dct: Option<Dct>,
    window: Vec<f64>,
    filterbank: FilterBank,
    dither: GaussianDither,
    feat_length: usize,

    samples: Vec<f32>,
    real: Vec<f64>,
    imag: Vec<f64>,
    spectrum: Vec<f32>,
    channels: Vec<f64>,
    dct_data: Vec<f64>,
}

impl<Fr: FrameSource<f32>> MfccMaker<Fr> {
    pub fn new(source: Fr, opts: MelOpts) -> Result<Self, CoreError> {
        debug_assert!(
            !matches!(opts.output_type, OutputType::Mfcc)
                || opts.mfcc_order < opts.filterbank_num_bins,
            "mfcc_order must be less than filterbank_num_bins"
        );
        let fft_frame_length = opts.fft_frame_length();
        let fft = Fft::new(fft_frame_length)?;
        let dct = matches!(opts.output_type, OutputType::Mfcc)
            .then(|| Dct::new(opts.filterbank_num_bins));
        let window = window::build(opts.window, opts.frame_length, opts.blackman_coeff);
        let filterbank =
            FilterBank::new(opts.filterbank_num_bins, fft_frame_length, opts.sample_rate);
        let feat_length = opts.feat_length();

        Ok(Self {
            source,
            opts,
            fft,
            dct,
            window,
            filterbank,
            dither: GaussianDither::new(0),
            feat_length,
            samples: vec![0.0; opts.frame_length],
            real: vec![0.0; fft_frame_length],
            imag: vec![0.0; fft_frame_length],
            spectrum: vec![0.0; fft_frame_length / 2 + 1],
            channels: vec![0.0; opts.filterbank_num_bins],
            dct_data: vec![0.0; opts.filterbank_num_bins * 2],
        })
    }

    pub fn feat_length(&self) -> usize {
        self.feat_length
    }

    /// Fills `dst` (length [`feat_length`](Self::feat_length)) with one
    /// feature vector. Returns `false` on a clean end of stream.
    pub fn read_frame(&mut self, dst: &mut [f32]) -> Result<bool, CoreError> {
        if dst.len() != self.feat_length {
            return Err(MfccError::IncorrectFrameSize {
                expected: self.feat_length,
                actual: dst.len(),
            }
            .into());
        }

        if !self.source.read_frame(&mut self.samples)? {
            return Ok(false);
        }

        let l = self.opts.frame_length;

        if self.opts.dither != 0.0 {
            self.dither.add_noise(&mut self.samples, self.opts.dither);
        }

        if self.opts.remove_dc_offset {
            let mean = self.samples.iter().sum::<f32>() / l as f32;
            for s in &mut self.samples {
                *s -= mean;
            }
        }

        let log_energy = if self.opts.output_energy {
            let energy: f64 = self.samples.iter().map(|&s| (s as f64).powi(2)).sum();
            Some(if energy > 0.0 { energy.ln() } else { -1.0e10 })
        } else {
            None
        };

        if self.opts.preemph_coeff != 0.0 {
            let coeff = self.opts.preemph_coeff;
            for i in (1..l).rev() {
                self.samples[i] -= coeff * self.samples[i - 1];
            }
            self.samples[0] -= coeff * self.samples[0];
        }

        for (s, w) in self.samples.iter_mut().zip(self.window.iter()) {
            *s = (*s as f64 * w) as f32;
        }

        self.real.fill(0.0);
        self.imag.fill(0.0);
        for (dst, &src) in self.real.iter_mut().zip(self.samples.iter()) {
            *dst = src as f64;
        }
        self.fft.fftr(&mut self.real, &mut self.imag)?;

        let half = self.real.len() / 2;
        self.spectrum[0] = 0.0;
        for k in 1..=half {
            self.spectrum[k] = (self.real[k].powi(2) + self.imag[k].powi(2)).sqrt() as f32;
        }

        self.channels.fill(0.0);
        self.filterbank.accumulate(&self.spectrum, &mut self.channels);
        for c in &mut self.channels {
            *c = c.max(self.opts.filterbank_floor).ln();
        }

        let c0 = self.opts.output_c0.then(|| {
            (2.0 / self.opts.filterbank_num_bins as f64).sqrt() * self.channels.iter().sum::<f64>()
        });

        let mut cursor;
        match self.opts.output_type {
            OutputType::MelEnergy => {
                for (d, &c) in dst.iter_mut().zip(self.channels.iter()) {
                    *d = c as f32;
                }
                cursor = self.channels.len();
            }
            OutputType::Mfcc => {
                let dct = self.dct.as_mut().expect("dct present for Mfcc output");
                let n = self.opts.filterbank_num_bins;
                self.dct_data[..n].copy_from_slice(&self.channels);
                self.dct_data[n..].fill(0.0);
                dct.apply(&mut self.dct_data[..2 * n])?;

                if self.opts.liftering_coeff != 0.0 {
                    let lc = self.opts.liftering_coeff;
                    for (i, coeff) in self.dct_data[..=self.opts.mfcc_order]
                        .iter_mut()
                        .enumerate()
                    {
                        *coeff *= 1.0 + lc / 2.0 * (std::f64::consts::PI * i as f64 / lc).sin();
                    }
                }

                let order = self.opts.mfcc_order;
                for (d, &c) in dst[..order].iter_mut().zip(self.dct_data[1..=order].iter()) {
                    *d = c as f32;
                }
                cursor = order;
            }
        }

        if let Some(c0) = c0 {
            dst[cursor] = c0 as f32;
            cursor += 1;
        }
        if let Some(log_energy) = log_energy {
            dst[cursor] = log_energy as f32;
        }

        Ok(true)
    }

    /// Emits one frame's little-endian float32 bytes per call. Returns `0`
    /// on clean end of stream.
    pub fn read(&mut self, bytes: &mut [u8]) -> Result<usize, CoreError> {
        let needed = self.feat_length * 4;
        if bytes.len() < needed {
            return Err(MfccError::BufferTooShort {
                needed,
                actual: bytes.len(),
            }
            .into());
        }

        let mut frame = vec![0.0f32; self.feat_length];
        if !self.read_frame(&mut frame)? {
            return Ok(0);
        }
        for (dst, sample) in bytes.chunks_exact_mut(4).zip(frame.iter()) {
            dst.copy_from_slice(&sample.to_le_bytes());
        }
        Ok(needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::ByteFrameSource;
    use std::io::Cursor;

    fn frame_bytes(samples: &[f32]) -> Vec<u8> {
        let mut out = Vec::new();
        for &s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn feat_length_matches_mfcc_with_c0_and_energy() {
        let opts = MelOpts {
            output_c0: true,
            ..MelOpts::default()
        };
        assert_eq!(opts.feat_length(), opts.mfcc_order + 2);
    }

    #[test]
    fn feat_length_matches_mel_energy() {
        let opts = MelOpts {
            output_type: OutputType::MelEnergy,
            output_c0: false,
            output_energy: false,
            ..MelOpts::default()
        };
        assert_eq!(opts.feat_length(), opts.filterbank_num_bins);
    }

    #[test]
    fn produces_one_vector_per_frame_then_eos() {
        let opts = MelOpts {
            frame_length: 256,
            dither: 0.0,
            remove_dc_offset: false,
            output_c0: true,
            ..MelOpts::default()
        };
        let samples: Vec<f32> = (0..256).map(|i| (i as f32 * 0.01).sin()).collect();
        let src = ByteFrameSource::new(Cursor::new(frame_bytes(&samples)), 256);
        let mut maker = MfccMaker::new(src, opts).unwrap();

        let mut dst = vec![0.0f32; maker.feat_length()];
        assert!(maker.read_frame(&mut dst).unwrap());
        assert!(dst.iter().all(|v| v.is_finite()));
        assert!(!maker.read_frame(&mut dst).unwrap());
    }

    #[test]
    fn wrong_dst_length_is_error() {
        let opts = MelOpts::default();
        let samples = vec![0.0f32; 256];
        let src = ByteFrameSource::new(Cursor::new(frame_bytes(&samples)), 256);
        let mut maker = MfccMaker::new(src, opts).unwrap();
        let mut dst = vec![0.0f32; 3];
        assert!(maker.read_frame(&mut dst).is_err());
    }

    #[test]
    fn read_reports_buffer_too_short() {
        let opts = MelOpts::default();
        let samples = vec![0.0f32; 256];
        let src = ByteFrameSource::new(Cursor::new(frame_bytes(&samples)), 256);
        let mut maker = MfccMaker::new(src, opts).unwrap();
        let mut tiny = vec![0u8; 2];
        assert!(maker.read(&mut tiny).is_err());
    }
}

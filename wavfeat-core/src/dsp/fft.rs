//! Real-input radix-2 FFT driven by a shared sine table (§4.3).

use crate::utils::errors::{CoreError, FftError};

/// Precomputed sine table shared by every `fftr`/`fft` call up to
/// `max_length`. Immutable after construction (§9, FFT twiddle sharing).
pub struct Fft {
    max_length: usize,
    sine: Vec<f64>,
}

impl Fft {
    /// `max_length` must be a power of two; it bounds every transform length
    /// this instance can later be asked to run.
    pub fn new(max_length: usize) -> Result<Self, CoreError> {
        if max_length < 2 || !max_length.is_power_of_two() {
            return Err(FftError::InvalidSize(max_length).into());
        }
        let table_len = max_length - max_length / 4 + 1;
        let sine = (0..table_len)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / max_length as f64).sin())
            .collect();
        Ok(Self { max_length, sine })
    }

    fn sin_at(&self, i: usize) -> f64 {
        self.sine[i]
    }

    fn cos_at(&self, i: usize) -> f64 {
        self.sine[i + self.max_length / 4]
    }

    fn check_lengths(&self, real: &[f64], imag: &[f64]) -> Result<usize, CoreError> {
        if real.len() != imag.len() {
            return Err(FftError::DataSizeMismatch {
                real: real.len(),
                imag: imag.len(),
            }
            .into());
        }
        let n = real.len();
        if n < 2 || !n.is_power_of_two() || n > self.max_length {
            return Err(FftError::InvalidSize(n).into());
        }
        Ok(n)
    }

    /// In-place iterative radix-2 decimation-in-frequency complex FFT.
    pub fn fft(&self, real: &mut [f64], imag: &mut [f64]) -> Result<(), CoreError> {
        let n = self.check_lengths(real, imag)?;

        let mut size = n;
        let mut step = self.max_length / n;
        while size > 1 {
            let half = size / 2;
            let mut base = 0;
            while base < n {
                let mut idx = 0usize;
                for j in 0..half {
                    let c = self.cos_at(idx);
                    let s = self.sin_at(idx);
                    let i1 = base + j;
                    let i2 = i1 + half;
                    let tr = real[i1] - real[i2];
                    let ti = imag[i1] - imag[i2];
                    real[i1] += real[i2];
                    imag[i1] += imag[i2];
                    real[i2] = tr * c + ti * s;
                    imag[i2] = ti * c - tr * s;
                    idx += step;
                }
                base += size;
            }
            step *= 2;
            size = half;
        }

        let bits = n.trailing_zeros();
        for i in 0..n {
            let j = reverse_bits(i, bits);
            if i < j {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }
        Ok(())
    }

    /// Real-input FFT of length `m` (power of two, `m <= max_length`),
    /// built from an `m/2`-point complex FFT via even/odd deinterleave and
    /// conjugate-symmetry recombination. The imaginary input is ignored.
    pub fn fftr(&self, real: &mut [f64], imag: &mut [f64]) -> Result<(), CoreError> {
        let m = self.check_lengths(real, imag)?;
        let half = m / 2;

        if half >= 1 {
            for i in 0..m {
                if i % 2 == 0 {
                    real[i / 2] = real[i];
                } else {
                    imag[(i - 1) / 2] = real[i];
                }
            }
        }

        if half > 1 {
            self.fft(&mut real[..half], &mut imag[..half])?;
        }

        let table_step = self.max_length / m;
        for i in 1..half {
            let c = self.cos_at(i * table_step);
            let s = self.sin_at(i * table_step);
            let ti = imag[half - i] + imag[i];
            let tr = real[half - i] - real[i];
            let r_lo = real[i];
            let r_hi = real[half - i];
            let im_lo = imag[i];
            let im_hi = imag[half - i];
            real[half + i] = 0.5 * (r_hi + r_lo + c * ti - s * tr);
            imag[half + i] = 0.5 * (im_lo - im_hi + s * ti + c * tr);
        }

        real[half] = real[0] - imag[0];
        imag[half] = 0.0;
        let r0 = real[0] + imag[0];
        real[0] = r0;
        imag[0] = 0.0;

        for i in 1..half {
            real[i] = real[m - i];
            imag[i] = -imag[m - i];
        }

        Ok(())
    }
}

fn reverse_bits(mut value: usize, bits: u32) -> usize {
    let mut out = 0usize;
    for _ in 0..bits {
        out = (out << 1) | (value & 1);
        value >>= 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response_is_flat_unity() {
        let fft = Fft::new(16).unwrap();
        let mut real = vec![0.0f64; 16];
        let mut imag = vec![0.0f64; 16];
        real[0] = 1.0;
        fft.fftr(&mut real, &mut imag).unwrap();
        for &r in &real {
            assert!((r - 1.0).abs() < 1e-9, "{r}");
        }
        for &i in &imag {
            assert!(i.abs() < 1e-9, "{i}");
        }
    }

    #[test]
    fn conjugate_symmetry_holds_for_arbitrary_real_input() {
        let fft = Fft::new(16).unwrap();
        let mut real: Vec<f64> = (0..16).map(|i| (i as f64 * 0.37).sin()).collect();
        let mut imag = vec![0.0f64; 16];
        fft.fftr(&mut real, &mut imag).unwrap();
        for k in 1..16 {
            assert!((real[k] - real[16 - k]).abs() < 1e-6);
            assert!((imag[k] + imag[16 - k]).abs() < 1e-6);
        }
    }

    #[test]
    fn reference_vector_matches_expected_dft() {
        let fft = Fft::new(16).unwrap();
        let mut real = vec![0.0f64; 16];
        let mut imag = vec![0.0f64; 16];
        for (i, slot) in real.iter_mut().enumerate().take(10) {
            *slot = i as f64;
        }
        fft.fftr(&mut real, &mut imag).unwrap();
        assert!((real[0] - 45.0).abs() < 1e-3, "{}", real[0]);
        assert!((real[1] - (-25.452)).abs() < 1e-2, "{}", real[1]);
        assert!((real[2] - 10.364).abs() < 1e-2, "{}", real[2]);
    }

    #[test]
    fn mismatched_lengths_error() {
        let fft = Fft::new(16).unwrap();
        let mut real = vec![0.0f64; 16];
        let mut imag = vec![0.0f64; 8];
        assert!(fft.fftr(&mut real, &mut imag).is_err());
    }

    #[test]
    fn non_power_of_two_length_errors() {
        let fft = Fft::new(16).unwrap();
        let mut real = vec![0.0f64; 15];
        let mut imag = vec![0.0f64; 15];
        assert!(fft.fftr(&mut real, &mut imag).is_err());
    }
}

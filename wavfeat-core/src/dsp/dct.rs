//! Type-II-style DCT built from a DFT on a mirrored/symmetric extension
//! with complex twiddle scaling (§4.4).
//!
//! Uses a naive `O(N^2)` DFT matrix rather than a recursive FFT-based
//! construction (§9, DCT kernel complexity permits either).

use crate::utils::errors::{CoreError, DctError};

/// Owned mutable DCT workspace for a fixed input size `N`. Not thread-safe:
/// [`apply`](Self::apply) reuses its scratch buffers across calls.
pub struct Dct {
    n: usize,
    twiddle_real: Vec<f64>,
    twiddle_imag: Vec<f64>,
    // cos_table[k][n] / sin_table[k][n] for k in 0..N, n in 0..2N.
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
    local_real: Vec<f64>,
    local_imag: Vec<f64>,
}

impl Dct {
    pub fn new(n: usize) -> Self {
        let m = 2 * n;
        let scale = 1.0 / (m as f64).sqrt();

        let mut twiddle_real: Vec<f64> = (0..n)
            .map(|k| (k as f64 * std::f64::consts::PI / m as f64).cos() * scale)
            .collect();
        let mut twiddle_imag: Vec<f64> = (0..n)
            .map(|k| -(k as f64 * std::f64::consts::PI / m as f64).sin() * scale)
            .collect();
        if n > 0 {
            twiddle_real[0] /= std::f64::consts::SQRT_2;
            twiddle_imag[0] /= std::f64::consts::SQRT_2;
        }

        let mut cos_table = vec![0.0f64; n * m];
        let mut sin_table = vec![0.0f64; n * m];
        for k in 0..n {
            for t in 0..m {
                let theta = 2.0 * std::f64::consts::PI * (k * t) as f64 / m as f64;
                cos_table[k * m + t] = theta.cos();
                sin_table[k * m + t] = theta.sin();
            }
        }

        Self {
            n,
            twiddle_real,
            twiddle_imag,
            cos_table,
            sin_table,
            local_real: vec![0.0; m],
            local_imag: vec![0.0; m],
        }
    }

    /// `data` must have length `2N`: the first `N` entries are the real
    /// part of the input sequence, the next `N` its imaginary part. On
    /// return, `data[0..N]` holds the DCT-II-style coefficients and
    /// `data[N..2N]` the (ideally near-zero) residual imaginary component.
    pub fn apply(&mut self, data: &mut [f64]) -> Result<(), CoreError> {
        let n = self.n;
        let m = 2 * n;
        if data.len() != m {
            return Err(DctError::InvalidSize {
                expected: m,
                actual: data.len(),
            }
            .into());
        }

        for i in 0..n {
            self.local_real[i] = data[i];
            self.local_imag[i] = data[i + n];
            self.local_real[i + n] = data[n - 1 - i];
            self.local_imag[i + n] = data[m - 1 - i];
        }

        for k in 0..n {
            let mut tmp_real = 0.0f64;
            let mut tmp_imag = 0.0f64;
            let row = k * m;
            for t in 0..m {
                let c = self.cos_table[row + t];
                let s = self.sin_table[row + t];
                tmp_real += self.local_real[t] * c + self.local_imag[t] * s;
                tmp_imag += self.local_imag[t] * c - self.local_real[t] * s;
            }
            let wr = self.twiddle_real[k];
            let wi = self.twiddle_imag[k];
            data[k] = tmp_real * wr - tmp_imag * wi;
            data[k + n] = tmp_real * wi + tmp_imag * wr;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_vector_matches_expected_dct() {
        let mut dct = Dct::new(16);
        let mut data = vec![0.0f64; 32];
        for i in 0..16 {
            data[i] = i as f64;
        }
        dct.apply(&mut data).unwrap();
        assert!((data[0] - 30.0).abs() < 1e-4, "{}", data[0]);
        assert!((data[1] - (-18.3115)).abs() < 1e-3, "{}", data[1]);
    }

    #[test]
    fn wrong_length_is_error() {
        let mut dct = Dct::new(16);
        let mut data = vec![0.0f64; 31];
        assert!(dct.apply(&mut data).is_err());
    }
}

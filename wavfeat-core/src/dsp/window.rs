//! Analysis windows applied before the FFT (§4.5, step 6).

/// Selects the analysis window applied to each frame before the FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    #[default]
    Povey,
    Hanning,
    Hamming,
    Rectangular,
    Blackman,
}

/// Builds the length-`length` window coefficients for `kind`.
///
/// `blackman_coeff` is only used by [`WindowKind::Blackman`].
pub fn build(kind: WindowKind, length: usize, blackman_coeff: f64) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length];
    }
    let a = 2.0 * std::f64::consts::PI / (length - 1) as f64;
    (0..length)
        .map(|i| {
            let x = a * i as f64;
            match kind {
                WindowKind::Hanning => 0.5 - 0.5 * x.cos(),
                WindowKind::Hamming => 0.54 - 0.46 * x.cos(),
                WindowKind::Povey => (0.5 - 0.5 * x.cos()).powf(0.85),
                WindowKind::Rectangular => 1.0,
                WindowKind::Blackman => {
                    blackman_coeff - 0.5 * x.cos() + (0.5 - blackman_coeff) * (2.0 * x).cos()
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanning_endpoints_are_zero() {
        let w = build(WindowKind::Hanning, 8, 0.42);
        assert!(w[0].abs() < 1e-9);
        assert!((w[7] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn rectangular_is_all_ones() {
        let w = build(WindowKind::Rectangular, 5, 0.42);
        assert!(w.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn povey_is_hanning_raised_to_power() {
        let hann = build(WindowKind::Hanning, 8, 0.42);
        let povey = build(WindowKind::Povey, 8, 0.42);
        for (h, p) in hann.iter().zip(povey.iter()) {
            assert!((p - h.powf(0.85)).abs() < 1e-9);
        }
    }

    #[test]
    fn single_sample_window_is_trivially_one() {
        let w = build(WindowKind::Hamming, 1, 0.42);
        assert_eq!(w, vec![1.0]);
    }
}

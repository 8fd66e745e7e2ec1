//! Analysis windows for the short-time Fourier transform.
//!
//! Each window comes in two flavours: *periodic* (denominator `n`, the
//! DFT-even form used for spectral analysis with overlap-add) and
//! *symmetric* (denominator `n - 1`, the filter-design form that
//! `scipy.signal.windows` returns by default).

use std::f32::consts::PI;

fn cosine_sum(n: usize, symmetric: bool, coeffs: &[f32]) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = if symmetric { (n - 1) as f32 } else { n as f32 };
    (0..n)
        .map(|i| {
            let a = 2.0 * PI * i as f32 / m;
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * c * (k as f32 * a).cos()
                })
                .sum()
        })
        .collect()
}

/// Compute a Hann (raised cosine) window.
///
/// # Arguments
/// * `n` - Window length
/// * `symmetric` - Use the symmetric (`n - 1`) instead of the periodic form
pub fn hann(n: usize, symmetric: bool) -> Vec<f32> {
    cosine_sum(n, symmetric, &[0.5, 0.5])
}

/// Compute a Hamming window.
///
/// The Hamming window is similar to the Hann window but with slightly
/// different coefficients that reduce the first side lobe level.
///
/// # Arguments
/// * `n` - Window length
/// * `symmetric` - Use the symmetric (`n - 1`) instead of the periodic form
///
/// # Example
/// ```
/// use melfbank::window::hamming;
///
/// let w = hamming(400, true);
/// assert!((w[0] - 0.08).abs() < 1e-6);
/// assert!((w[399] - 0.08).abs() < 1e-6);
/// ```
pub fn hamming(n: usize, symmetric: bool) -> Vec<f32> {
    cosine_sum(n, symmetric, &[0.54, 0.46])
}

/// Compute a Blackman window.
///
/// Better side lobe suppression than Hann or Hamming, at the cost of a
/// wider main lobe.
pub fn blackman(n: usize, symmetric: bool) -> Vec<f32> {
    cosine_sum(n, symmetric, &[0.42, 0.5, 0.08])
}

/// Window type specification for [`get_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    Hann,
    #[default]
    Hamming,
    Blackman,
}

/// Get a window of the specified type and length.
pub fn get_window(window: WindowType, n: usize, symmetric: bool) -> Vec<f32> {
    match window {
        WindowType::Hann => hann(n, symmetric),
        WindowType::Hamming => hamming(n, symmetric),
        WindowType::Blackman => blackman(n, symmetric),
    }
}

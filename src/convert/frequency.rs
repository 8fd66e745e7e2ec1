use super::{hz_to_mel, mel_to_hz};
use ndarray::{Array, Array1, ArrayBase, Data, Dimension};

/// Convert a frequency in Hz to a (continuous) FFT bin position.
///
/// The result is not rounded: 1000 Hz at 16 kHz with a 512-point FFT is
/// bin 32.0, 1010 Hz is bin 32.32.
///
/// # Arguments
/// * `hz` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `fft_length` - FFT size
#[inline]
pub fn hz_to_bin(hz: f64, sample_rate: f64, fft_length: usize) -> f64 {
    hz * fft_length as f64 / sample_rate
}

/// Convert a (possibly fractional) FFT bin index to Hz.
///
/// This is the inverse of [`hz_to_bin`].
#[inline]
pub fn bin_to_hz(bin: f64, sample_rate: f64, fft_length: usize) -> f64 {
    sample_rate * bin / fft_length as f64
}

/// Element-wise [`hz_to_bin`] over an array of any shape.
pub fn hz_to_bin_array<S, D>(hz: &ArrayBase<S, D>, sample_rate: f64, fft_length: usize) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    hz.mapv(|f| hz_to_bin(f, sample_rate, fft_length))
}

/// Element-wise [`bin_to_hz`] over an array of any shape.
pub fn bin_to_hz_array<S, D>(bins: &ArrayBase<S, D>, sample_rate: f64, fft_length: usize) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    bins.mapv(|k| bin_to_hz(k, sample_rate, fft_length))
}

/// Frequencies (Hz) linearly spaced on the mel scale.
///
/// Returns `n` points from `fmin` to `fmax` inclusive. Both endpoints are
/// reproduced up to the floating-point error of the mel round trip.
///
/// # Example
/// ```
/// use melfbank::convert::mel_frequencies;
///
/// let f = mel_frequencies(12, 0.0, 8000.0);
/// assert_eq!(f.len(), 12);
/// assert!((f[11] - 8000.0).abs() < 1e-6);
/// ```
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Array1<f64> {
    let mels = Array1::linspace(hz_to_mel(fmin), hz_to_mel(fmax), n);
    mels.mapv(mel_to_hz)
}

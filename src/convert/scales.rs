use ndarray::{Array, ArrayBase, Data, Dimension};

/// Convert a frequency in Hz to the (HTK) mel scale.
///
/// `mel = 2595 * log10(1 + hz / 700)`
///
/// The input is expected to be non-negative. This is not checked: values
/// below -700 Hz yield NaN and values in `(-700, 0)` yield negative mels.
///
/// # Example
/// ```
/// use melfbank::convert::{hz_to_mel, mel_to_hz};
///
/// let mel = hz_to_mel(1000.0);
/// assert!((mel - 999.99).abs() < 0.1);
/// assert!((mel_to_hz(mel) - 1000.0).abs() < 1e-9);
/// ```
#[inline]
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert a frequency on the (HTK) mel scale to Hz.
///
/// This is the inverse of [`hz_to_mel`].
#[inline]
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Element-wise [`hz_to_mel`] over an array of any shape.
pub fn hz_to_mel_array<S, D>(hz: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    hz.mapv(hz_to_mel)
}

/// Element-wise [`mel_to_hz`] over an array of any shape.
pub fn mel_to_hz_array<S, D>(mel: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    mel.mapv(mel_to_hz)
}

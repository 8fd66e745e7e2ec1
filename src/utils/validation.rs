/// Validate audio data.
///
/// Checks that the audio data satisfies the following conditions:
/// - Data is not empty
/// - All samples are finite (no NaN or Inf)
///
/// # Example
/// ```
/// use melfbank::utils::valid_audio;
///
/// let y = vec![0.0, 0.5, -0.5, 0.0];
/// assert!(valid_audio(&y).is_ok());
///
/// let empty: Vec<f32> = vec![];
/// assert!(valid_audio(&empty).is_err());
/// ```
pub fn valid_audio(y: &[f32]) -> crate::Result<()> {
    if y.is_empty() {
        return Err(crate::Error::EmptyAudio);
    }

    if !y.iter().all(|&v| v.is_finite()) {
        return Err(crate::Error::NonFiniteAudio);
    }

    Ok(())
}

use crate::window;
use ndarray::Array2;
use num_complex::Complex32;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Short-time Fourier transform parameters.
///
/// The analysis window has `window.len()` samples and is zero-padded at
/// the end to `size` before the FFT. Frames advance by `shift` samples.
#[derive(Debug, Clone)]
pub struct StftConfig {
    pub size: usize,
    pub shift: usize,
    pub window: Vec<f32>,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            size: 512,
            shift: 160,
            window: window::hamming(400, true),
        }
    }
}

impl StftConfig {
    /// Number of non-redundant frequency bins, `size / 2 + 1`.
    pub fn n_freq(&self) -> usize {
        self.size / 2 + 1
    }

    /// Number of full frames in a signal of `len` samples (no padding).
    pub fn n_frames(&self, len: usize) -> usize {
        let window_length = self.window.len();
        if len < window_length {
            0
        } else {
            (len - window_length) / self.shift + 1
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.size == 0 {
            return Err(crate::Error::InvalidSize {
                name: "size",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.shift == 0 {
            return Err(crate::Error::InvalidSize {
                name: "shift",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.window.is_empty() || self.window.len() > self.size {
            return Err(crate::Error::InvalidSize {
                name: "window_length",
                value: self.window.len(),
                reason: "must be in 1..=size",
            });
        }
        Ok(())
    }
}

#[inline]
fn compute_frame(
    frame: usize,
    y: &[f32],
    config: &StftConfig,
    fft: &Arc<dyn RealToComplex<f32>>,
) -> crate::Result<Vec<Complex32>> {
    let start = frame * config.shift;
    let mut buffer = fft.make_input_vec();
    for (i, (b, w)) in buffer.iter_mut().zip(config.window.iter()).enumerate() {
        *b = y[start + i] * w;
    }
    let mut spectrum = fft.make_output_vec();
    fft.process(&mut buffer, &mut spectrum)?;
    Ok(spectrum)
}

/// Compute the Short-Time Fourier Transform (STFT) of a real signal.
///
/// Frames are taken without centering or end padding: trailing samples
/// that do not fill a whole window are dropped.
///
/// # Returns
/// Complex STFT matrix of shape `(n_frames, size / 2 + 1)`
///
/// # Errors
/// Returns an error if the audio is empty or non-finite, or if the size,
/// shift or window length is invalid.
///
/// # Example
/// ```
/// use melfbank::spectrum::{StftConfig, stft};
///
/// let y = vec![0.1f32; 16000];
/// let s = stft(&y, &StftConfig::default()).unwrap();
/// assert_eq!(s.shape(), &[98, 257]);
/// ```
pub fn stft(y: &[f32], config: &StftConfig) -> crate::Result<Array2<Complex32>> {
    crate::utils::valid_audio(y)?;
    config.validate()?;

    let n_frames = config.n_frames(y.len());
    let n_freq = config.n_freq();
    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(config.size);

    let frame_results: Vec<Vec<Complex32>> = {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..n_frames)
                .into_par_iter()
                .map(|frame| compute_frame(frame, y, config, &fft))
                .collect::<crate::Result<_>>()?
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..n_frames)
                .map(|frame| compute_frame(frame, y, config, &fft))
                .collect::<crate::Result<_>>()?
        }
    };

    let mut stft_matrix = Array2::<Complex32>::zeros((n_frames, n_freq));
    for (frame, result) in frame_results.iter().enumerate() {
        for (f, &val) in result.iter().enumerate() {
            stft_matrix[(frame, f)] = val;
        }
    }

    Ok(stft_matrix)
}

/// Power spectrogram `|X|^2` of an STFT matrix.
pub fn stft_to_spectrogram(stft_matrix: &Array2<Complex32>) -> Array2<f32> {
    stft_matrix.mapv(|v| v.norm_sqr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stft_shape_no_padding() {
        let cfg = StftConfig::default();
        let y = vec![0.0f32; 1000];
        let s = stft(&y, &cfg).unwrap();
        // (1000 - 400) / 160 + 1
        assert_eq!(s.shape(), &[4, 257]);
    }

    #[test]
    fn test_stft_short_signal_has_no_frames() {
        let cfg = StftConfig::default();
        let s = stft(&[0.5f32; 399], &cfg).unwrap();
        assert_eq!(s.shape(), &[0, 257]);
    }

    #[test]
    fn test_stft_invalid_config() {
        let y = vec![0.0f32; 1000];
        let mut cfg = StftConfig::default();
        cfg.shift = 0;
        assert!(stft(&y, &cfg).is_err());

        let mut cfg = StftConfig::default();
        cfg.window = vec![1.0; 600];
        assert!(stft(&y, &cfg).is_err());

        assert!(stft(&[], &StftConfig::default()).is_err());
    }

    #[test]
    fn test_fft_errors_propagate() {
        let fft = RealFftPlanner::<f32>::new().plan_fft_forward(8);
        let mut spectrum = fft.make_output_vec();
        let err = fft.process(&mut [0.0f32; 3], &mut spectrum).unwrap_err();
        assert!(matches!(crate::Error::from(err), crate::Error::Fft(_)));

        let cfg = StftConfig {
            size: 8,
            shift: 4,
            window: vec![1.0; 8],
        };
        let frame = compute_frame(0, &[1.0f32; 8], &cfg, &fft).unwrap();
        assert_eq!(frame.len(), 5);
    }

    #[test]
    fn test_stft_dc_bin() {
        let cfg = StftConfig {
            size: 8,
            shift: 4,
            window: vec![1.0; 4],
        };
        let s = stft(&[1.0f32; 12], &cfg).unwrap();
        assert_eq!(s.shape(), &[3, 5]);
        // rectangular window of 4 ones, zero-padded to 8
        assert_relative_eq!(s[(0, 0)].re, 4.0, epsilon = 1e-5);
        assert_relative_eq!(s[(2, 0)].re, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_spectrogram_sine_peak() {
        let sr = 16000.0f32;
        let y: Vec<f32> = (0..4000)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr).sin())
            .collect();
        let spec = stft_to_spectrogram(&stft(&y, &StftConfig::default()).unwrap());
        let row = spec.row(3);
        let peak = row
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        // 1000 Hz at 16 kHz with 512 bins sits on bin 32
        assert_eq!(peak.0, 32);
        assert!(spec.iter().all(|&v| v >= 0.0));
    }
}

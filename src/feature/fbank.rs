//! Mel filterbank energy features.
//!
//! The classic speech front end: DC offset compensation and preemphasis,
//! a Hamming-windowed STFT without end padding, the power spectrogram
//! scaled by the FFT size, and a bank of unit-sum triangular mel filters.

use crate::effects::preemphasis_with_offset_compensation;
use crate::spectrum::{StftConfig, stft, stft_to_spectrogram};
use crate::transform::{MelConfig, MelTransform};
use crate::window::{WindowType, get_window};
use ndarray::{Array2, Axis, Ix2};

/// Parameters of [`fbank`] and [`logfbank`].
///
/// Defaults are 25 ms windows with a 10 ms shift at 16 kHz.
#[derive(Debug, Clone, PartialEq)]
pub struct FbankConfig {
    pub sample_rate: u32,
    /// Analysis window length in samples.
    pub window_length: usize,
    /// Hop between successive windows in samples.
    pub stft_shift: usize,
    pub number_of_filters: usize,
    pub stft_size: usize,
    pub lowest_frequency: f64,
    /// `None` or `Some(0.0)` is the Nyquist frequency.
    pub highest_frequency: Option<f64>,
    /// 0 disables preemphasis and offset compensation.
    pub preemphasis_factor: f32,
    pub window: WindowType,
    /// Subtract each filter's minimum over time.
    pub denoise: bool,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            window_length: 400,
            stft_shift: 160,
            number_of_filters: 23,
            stft_size: 512,
            lowest_frequency: 0.0,
            highest_frequency: None,
            preemphasis_factor: 0.97,
            window: WindowType::Hamming,
            denoise: false,
        }
    }
}

impl FbankConfig {
    fn stft_config(&self) -> StftConfig {
        StftConfig {
            size: self.stft_size,
            shift: self.stft_shift,
            window: get_window(self.window, self.window_length, true),
        }
    }

    fn mel_config(&self) -> MelConfig {
        MelConfig {
            sample_rate: self.sample_rate,
            stft_size: self.stft_size,
            number_of_filters: self.number_of_filters,
            lowest_frequency: self.lowest_frequency,
            highest_frequency: self.highest_frequency.filter(|&f| f != 0.0),
            log: false,
            ..MelConfig::default()
        }
    }
}

/// Compute mel filterbank energies of a time signal.
///
/// # Returns
/// Features of shape `(n_frames, number_of_filters)`
///
/// # Errors
/// Fails on empty or non-finite audio and on invalid STFT or filterbank
/// parameters.
///
/// # Example
/// ```
/// use melfbank::feature::fbank::{FbankConfig, fbank};
///
/// let y: Vec<f32> = (0..16000).map(|i| (i as f32 * 0.1).sin()).collect();
/// let feats = fbank(&y, &FbankConfig::default()).unwrap();
/// assert_eq!(feats.shape(), &[98, 23]);
/// ```
pub fn fbank(y: &[f32], config: &FbankConfig) -> crate::Result<Array2<f32>> {
    crate::utils::valid_audio(y)?;

    let emphasized = preemphasis_with_offset_compensation(y, config.preemphasis_factor);
    let stft_matrix = stft(&emphasized, &config.stft_config())?;
    let scale = config.stft_size as f32;
    let spectrogram = stft_to_spectrogram(&stft_matrix).mapv(|v| v / scale);

    let mel_transform = MelTransform::new(config.mel_config());
    let mut features = mel_transform
        .forward(spectrogram.into_dyn().view())?
        .into_dimensionality::<Ix2>()?;

    if config.denoise && features.nrows() > 0 {
        let floor = features.fold_axis(Axis(0), f32::INFINITY, |&acc, &v| acc.min(v));
        features -= &floor;
    }

    log::debug!(
        "extracted fbank features {:?} from {} samples",
        features.shape(),
        y.len()
    );
    Ok(features)
}

/// Log mel filterbank energies, `ln(fbank(y) + eps)`.
pub fn logfbank(y: &[f32], config: &FbankConfig, eps: f32) -> crate::Result<Array2<f32>> {
    Ok(fbank(y, config)?.mapv(|v| (v + eps).ln()))
}

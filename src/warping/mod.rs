//! Random frequency warping of filterbank center frequencies.
//!
//! Vocal tract length perturbation (VTLP, Jaitly & Hinton 2013) stretches
//! or compresses the frequency axis by a random factor `alpha` below a
//! breakpoint and maps the remainder linearly so that the Nyquist frequency
//! stays fixed. [`HzWarping`] does this on the linear frequency axis,
//! [`MelWarping`] on the mel axis. Both draw their parameters from
//! injected [`Sampler`]s; the warping arithmetic itself is deterministic.

mod piecewise;
mod sampling;

pub use piecewise::{hz_warping, mel_warping};
pub use sampling::{Constant, Sampler, Uniform};

use ndarray::{ArrayD, ArrayView1};

/// A (randomized) remapping of filterbank frequencies.
pub trait WarpingFn: Send + Sync {
    /// Warp `frequency` (Hz), drawing independent parameters for every
    /// element of `size`.
    ///
    /// The result must broadcast to `(*size, frequency.len())`.
    fn warp(
        &self,
        frequency: ArrayView1<f64>,
        size: &[usize],
        max_frequency: Option<f64>,
    ) -> crate::Result<ArrayD<f64>>;
}

/// The pair of samplers shared by both warping strategies.
pub struct WarpSamplers {
    alpha: Box<dyn Sampler>,
    fhi_ratio: Box<dyn Sampler>,
}

impl WarpSamplers {
    pub fn new(alpha: impl Sampler + 'static, fhi_ratio: impl Sampler + 'static) -> Self {
        Self {
            alpha: Box::new(alpha),
            fhi_ratio: Box::new(fhi_ratio),
        }
    }

    /// Draw `(alpha, fhi_ratio)` for a batch of shape `size`.
    pub fn draw(&self, size: &[usize]) -> (ArrayD<f64>, ArrayD<f64>) {
        (self.alpha.sample(size), self.fhi_ratio.sample(size))
    }
}

impl std::fmt::Debug for WarpSamplers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpSamplers").finish_non_exhaustive()
    }
}

/// Piecewise linear warping on the Hz axis with sampled parameters.
///
/// # Example
/// ```
/// use melfbank::convert::mel_frequencies;
/// use melfbank::warping::{HzWarping, Uniform, WarpingFn};
///
/// let warping = HzWarping::new(
///     Uniform::new(0.9, 1.1).unwrap(),
///     Uniform::new(0.6, 0.7).unwrap(),
/// );
/// let f = mel_frequencies(12, 0.0, 8000.0);
/// let warped = warping.warp(f.view(), &[4], Some(8000.0)).unwrap();
/// assert_eq!(warped.shape(), &[4, 12]);
/// ```
#[derive(Debug)]
pub struct HzWarping {
    samplers: WarpSamplers,
}

impl HzWarping {
    pub fn new(alpha: impl Sampler + 'static, fhi_ratio: impl Sampler + 'static) -> Self {
        Self {
            samplers: WarpSamplers::new(alpha, fhi_ratio),
        }
    }
}

impl WarpingFn for HzWarping {
    fn warp(
        &self,
        frequency: ArrayView1<f64>,
        size: &[usize],
        max_frequency: Option<f64>,
    ) -> crate::Result<ArrayD<f64>> {
        let (alpha, fhi_ratio) = self.samplers.draw(size);
        hz_warping(frequency, alpha.view(), fhi_ratio.view(), max_frequency)
    }
}

/// Piecewise linear warping on the mel axis with sampled parameters.
#[derive(Debug)]
pub struct MelWarping {
    samplers: WarpSamplers,
}

impl MelWarping {
    pub fn new(alpha: impl Sampler + 'static, fhi_ratio: impl Sampler + 'static) -> Self {
        Self {
            samplers: WarpSamplers::new(alpha, fhi_ratio),
        }
    }
}

impl WarpingFn for MelWarping {
    fn warp(
        &self,
        frequency: ArrayView1<f64>,
        size: &[usize],
        max_frequency: Option<f64>,
    ) -> crate::Result<ArrayD<f64>> {
        let (alpha, fhi_ratio) = self.samplers.draw(size);
        mel_warping(frequency, alpha.view(), fhi_ratio.view(), max_frequency)
    }
}

//! Linear spectrogram to (log) mel spectrogram mapping.

use crate::filterbank::{get_fbanks, normalize_rows};
use crate::utils::normalize_axes;
use crate::warping::WarpingFn;
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, Axis, Ix2, IxDyn};
use std::sync::OnceLock;

/// Relative singular value cutoff of the pseudo-inverse (numpy `rcond`).
const PINV_RCOND: f64 = 1e-15;

/// Filterbank parameters of a [`MelTransform`].
#[derive(Debug, Clone, PartialEq)]
pub struct MelConfig {
    pub sample_rate: u32,
    pub stft_size: usize,
    pub number_of_filters: usize,
    /// Onset of the first filter in Hz.
    pub lowest_frequency: f64,
    /// Offset of the last filter in Hz; `None` is the Nyquist frequency.
    pub highest_frequency: Option<f64>,
    /// Apply `ln(x + eps)` after the filterbank.
    pub log: bool,
    pub eps: f64,
}

impl MelConfig {
    pub fn new(sample_rate: u32, stft_size: usize, number_of_filters: usize) -> Self {
        Self {
            sample_rate,
            stft_size,
            number_of_filters,
            ..Self::default()
        }
    }

    /// Number of spectral bins the transform expects, `stft_size / 2 + 1`.
    pub fn n_freq(&self) -> usize {
        self.stft_size / 2 + 1
    }
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            stft_size: 512,
            number_of_filters: 40,
            lowest_frequency: 50.0,
            highest_frequency: None,
            log: true,
            eps: 1e-18,
        }
    }
}

/// Transforms a linear spectrogram into a (log) mel spectrogram.
///
/// The input's last axis holds the `stft_size / 2 + 1` spectral bins; all
/// leading axes are kept. The normalized filterbank (every filter sums to
/// one) and its pseudo-inverse are built on first use and cached for the
/// lifetime of the transform. Operators and arithmetic are `f64`; only the
/// returned features are narrowed to `f32`.
///
/// With a warping function every call draws fresh filterbanks: one per
/// index of the independent axes (axis 0 by default), shared across all
/// other axes.
///
/// # Example
/// ```
/// use melfbank::transform::{MelConfig, MelTransform};
/// use ndarray::ArrayD;
///
/// let mel = MelTransform::new(MelConfig::new(16000, 512, 40));
/// let spec = ArrayD::<f32>::zeros(vec![3, 1, 100, 257]);
/// let logmel = mel.forward(spec.view()).unwrap();
/// assert_eq!(logmel.shape(), &[3, 1, 100, 40]);
/// let rec = mel.inverse(logmel.view()).unwrap();
/// assert_eq!(rec.shape(), &[3, 1, 100, 257]);
/// ```
pub struct MelTransform {
    config: MelConfig,
    warping_fn: Option<Box<dyn WarpingFn>>,
    independent_axes: Vec<isize>,
    fbanks: OnceLock<Array2<f64>>,
    ifbanks: OnceLock<Array2<f64>>,
}

impl std::fmt::Debug for MelTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MelTransform")
            .field("config", &self.config)
            .field("warping", &self.warping_fn.is_some())
            .field("independent_axes", &self.independent_axes)
            .finish_non_exhaustive()
    }
}

impl MelTransform {
    pub fn new(config: MelConfig) -> Self {
        Self {
            config,
            warping_fn: None,
            independent_axes: vec![0],
            fbanks: OnceLock::new(),
            ifbanks: OnceLock::new(),
        }
    }

    /// Randomly warp the filterbank on every forward call.
    pub fn with_warping(mut self, warping_fn: impl WarpingFn + 'static) -> Self {
        self.warping_fn = Some(Box::new(warping_fn));
        self
    }

    /// Axes along which independently warped filterbanks are used.
    ///
    /// Negative axes count from the end. Only relevant with warping.
    pub fn with_independent_axes(mut self, axes: &[isize]) -> Self {
        self.independent_axes = axes.to_vec();
        self
    }

    pub fn config(&self) -> &MelConfig {
        &self.config
    }

    fn normalized_fbanks(
        &self,
        warping_fn: Option<&dyn WarpingFn>,
        size: &[usize],
    ) -> crate::Result<ArrayD<f64>> {
        let cfg = &self.config;
        let fbanks = get_fbanks(
            cfg.sample_rate,
            cfg.stft_size,
            cfg.number_of_filters,
            cfg.lowest_frequency,
            cfg.highest_frequency,
            warping_fn,
            size,
        )?;
        Ok(normalize_rows(&fbanks, cfg.eps))
    }

    /// Forward operator of shape `(stft_size / 2 + 1, number_of_filters)`.
    ///
    /// This is the transposed, row-normalized unwarped filterbank.
    pub fn fbanks(&self) -> crate::Result<&Array2<f64>> {
        if let Some(fbanks) = self.fbanks.get() {
            return Ok(fbanks);
        }
        let fbanks = self
            .normalized_fbanks(None, &[])?
            .into_dimensionality::<Ix2>()?
            .reversed_axes();
        log::debug!("cached mel operator {:?}", fbanks.shape());
        Ok(self.fbanks.get_or_init(|| fbanks))
    }

    /// Pseudo-inverse operator of shape `(number_of_filters, stft_size / 2 + 1)`.
    pub fn ifbanks(&self) -> crate::Result<&Array2<f64>> {
        if let Some(ifbanks) = self.ifbanks.get() {
            return Ok(ifbanks);
        }
        let fbanks = self.fbanks()?;
        let ifbanks = pinv(fbanks.t())?.reversed_axes();
        log::debug!("cached mel pseudo-inverse {:?}", ifbanks.shape());
        Ok(self.ifbanks.get_or_init(|| ifbanks))
    }

    /// Map a linear spectrogram `(..., F)` to mel bands `(..., K)`.
    ///
    /// # Errors
    /// Fails if the last axis does not have `stft_size / 2 + 1` bins, or
    /// (with warping) if an independent axis is outside `[0, ndim - 1)`.
    pub fn forward(&self, x: ArrayViewD<f32>) -> crate::Result<ArrayD<f32>> {
        let n_freq = self.config.n_freq();
        if x.ndim() == 0 || x.shape()[x.ndim() - 1] != n_freq {
            return Err(crate::Error::ShapeMismatch {
                expected: format!("(..., {n_freq})"),
                got: format!("{:?}", x.shape()),
            });
        }

        let mut out = match &self.warping_fn {
            None => matmul_last_axis(&x, self.fbanks()?.view())?,
            Some(_) => self.forward_warped(&x)?,
        };

        if self.config.log {
            let eps = self.config.eps;
            out.mapv_inplace(|v| (v + eps).ln());
        }
        Ok(out.mapv(|v| v as f32))
    }

    fn forward_warped(&self, x: &ArrayViewD<f32>) -> crate::Result<ArrayD<f64>> {
        let ndim = x.ndim();
        let axes = normalize_axes(&self.independent_axes, ndim)?;
        let leading = &x.shape()[..ndim - 1];
        let size: Vec<usize> = leading
            .iter()
            .enumerate()
            .map(|(i, &n)| if axes.contains(&i) { n } else { 1 })
            .collect();

        let fbanks = self.normalized_fbanks(self.warping_fn.as_deref(), &size)?;
        let n_filters = self.config.number_of_filters;
        let n_freq = self.config.n_freq();
        let batch: usize = size.iter().product();
        log::trace!("drew {batch} warped filterbanks for input {:?}", x.shape());

        // (batch, K, F) -> (batch, F, K)
        let fbanks = fbanks
            .into_shape_with_order((batch, n_filters, n_freq))?
            .permuted_axes([0, 2, 1]);
        if batch == 1 {
            return matmul_last_axis(x, fbanks.index_axis(Axis(0), 0));
        }

        let x = x.as_standard_layout();
        let frames = x.len() / n_freq;
        let x2 = x.view().into_shape_with_order((frames, n_freq))?;
        let mut out = Array2::<f64>::zeros((frames, n_filters));
        let mut index = vec![0usize; leading.len()];
        for (frame, mut row) in out.outer_iter_mut().enumerate() {
            unravel(frame, leading, &mut index);
            let mut b = 0usize;
            for (i, &n) in size.iter().enumerate() {
                b = b * n + if n == 1 { 0 } else { index[i] };
            }
            let frame_spec = x2.row(frame).mapv(f64::from);
            row.assign(&frame_spec.dot(&fbanks.index_axis(Axis(0), b)));
        }

        let mut shape = leading.to_vec();
        shape.push(n_filters);
        Ok(out.into_shape_with_order(IxDyn(&shape))?)
    }

    /// Approximately invert [`forward`](Self::forward).
    ///
    /// Undoes the log (if enabled), applies the pseudo-inverse of the
    /// unwarped filterbank and clips negative magnitudes to zero.
    pub fn inverse(&self, x: ArrayViewD<f32>) -> crate::Result<ArrayD<f32>> {
        let n_filters = self.config.number_of_filters;
        if x.ndim() == 0 || x.shape()[x.ndim() - 1] != n_filters {
            return Err(crate::Error::ShapeMismatch {
                expected: format!("(..., {n_filters})"),
                got: format!("{:?}", x.shape()),
            });
        }
        let ifbanks = self.ifbanks()?;
        let out = if self.config.log {
            let x = x.mapv(f32::exp);
            matmul_last_axis(&x.view(), ifbanks.view())?
        } else {
            matmul_last_axis(&x, ifbanks.view())?
        };
        Ok(out.mapv(|v| v.max(0.0) as f32))
    }
}

/// Row-major multi-index of `flat` within `shape`.
fn unravel(mut flat: usize, shape: &[usize], index: &mut [usize]) {
    for (i, &n) in shape.iter().enumerate().rev() {
        index[i] = flat % n;
        flat /= n;
    }
}

/// `x @ m` in f64, contracting the last axis of `x` with the rows of `m`.
fn matmul_last_axis(x: &ArrayViewD<f32>, m: ArrayView2<f64>) -> crate::Result<ArrayD<f64>> {
    let (n_in, n_out) = m.dim();
    let x = x.as_standard_layout();
    let rows = x.len() / n_in.max(1);
    let flat = x.view().into_shape_with_order((rows, n_in))?.mapv(f64::from);
    let mut shape = x.shape().to_vec();
    if let Some(last) = shape.last_mut() {
        *last = n_out;
    }
    Ok(flat.dot(&m).into_shape_with_order(IxDyn(&shape))?)
}

/// Moore-Penrose pseudo-inverse via SVD.
fn pinv(m: ArrayView2<f64>) -> crate::Result<Array2<f64>> {
    let (rows, cols) = m.dim();
    let matrix = DMatrix::from_fn(rows, cols, |i, j| m[(i, j)]);
    let svd = matrix.svd(true, true);
    let cutoff = PINV_RCOND * svd.singular_values.max();
    let inverse = svd
        .pseudo_inverse(cutoff)
        .map_err(|e| crate::Error::PseudoInverse(e.to_string()))?;
    Ok(Array2::from_shape_fn((cols, rows), |(i, j)| inverse[(i, j)]))
}

//! Triangular mel filterbanks.

use crate::convert::{hz_to_bin_array, mel_frequencies};
use crate::warping::WarpingFn;
use ndarray::{Array, Array3, ArrayBase, ArrayD, Axis, Data, Dimension, IxDyn};

/// Resolve the upper band edge of the filterbank.
///
/// `None` selects the Nyquist frequency. Negative values are wrapped as
/// `(highest mod sample_rate) / 2`, e.g. -1000 at 16 kHz gives 7500 Hz.
pub fn resolve_highest_frequency(sample_rate: u32, highest_frequency: Option<f64>) -> f64 {
    let nyquist = sample_rate as f64 / 2.0;
    match highest_frequency {
        None => nyquist,
        Some(f) if f < 0.0 => f.rem_euclid(sample_rate as f64) / 2.0,
        Some(f) => f,
    }
}

/// Compute (optionally warped) mel filterbanks.
///
/// Each of the `number_of_filters` rows is a triangle over the
/// `stft_size / 2 + 1` FFT bins. Onset, center and offset are consecutive
/// points of `number_of_filters + 2` frequencies spaced linearly on the mel
/// scale between `lowest_frequency` and `highest_frequency`, expressed as
/// continuous bin positions. Onsets are clamped to at most `center - 1` and
/// offsets to at least `center + 1` so that warping can never collapse a
/// triangle to zero width.
///
/// With a `warping_fn`, the frequencies are warped independently for every
/// element of `size`. The result always has shape
/// `(*size, number_of_filters, stft_size / 2 + 1)`; without warping the same
/// filterbank is repeated over `size`.
///
/// # Arguments
/// * `sample_rate` - Sample rate in Hz
/// * `stft_size` - FFT size
/// * `number_of_filters` - Number of triangular filters
/// * `lowest_frequency` - Onset frequency of the first filter (Hz)
/// * `highest_frequency` - Offset frequency of the last filter; see
///   [`resolve_highest_frequency`]
/// * `warping_fn` - Optional random remapping of the frequencies (VTLP)
/// * `size` - Shape of the independent leading axes
///
/// # Example
/// ```
/// use melfbank::filterbank::get_fbanks;
///
/// let fb = get_fbanks(8000, 32, 10, 0.0, None, None, &[]).unwrap();
/// assert_eq!(fb.shape(), &[10, 17]);
/// ```
pub fn get_fbanks(
    sample_rate: u32,
    stft_size: usize,
    number_of_filters: usize,
    lowest_frequency: f64,
    highest_frequency: Option<f64>,
    warping_fn: Option<&dyn WarpingFn>,
    size: &[usize],
) -> crate::Result<ArrayD<f64>> {
    if sample_rate == 0 {
        return Err(crate::Error::InvalidParameter {
            name: "sample_rate",
            value: "0".to_string(),
            reason: "must be > 0".to_string(),
        });
    }
    if stft_size == 0 {
        return Err(crate::Error::InvalidSize {
            name: "stft_size",
            value: 0,
            reason: "must be > 0",
        });
    }
    if number_of_filters == 0 {
        return Err(crate::Error::InvalidSize {
            name: "number_of_filters",
            value: 0,
            reason: "must be > 0",
        });
    }

    let sr = sample_rate as f64;
    let highest_frequency = resolve_highest_frequency(sample_rate, highest_frequency);
    let frequency = mel_frequencies(number_of_filters + 2, lowest_frequency, highest_frequency);
    let frequency = match warping_fn {
        Some(warping_fn) => warping_fn.warp(frequency.view(), size, Some(sr / 2.0))?,
        None => frequency.into_dyn(),
    };

    let mut points_shape = size.to_vec();
    points_shape.push(number_of_filters + 2);
    let frequency = frequency
        .broadcast(IxDyn(&points_shape))
        .ok_or_else(|| crate::Error::ShapeMismatch {
            expected: format!("warped frequencies broadcastable to {points_shape:?}"),
            got: format!("{:?}", frequency.shape()),
        })?;

    let batch: usize = size.iter().product();
    let bins = hz_to_bin_array(&frequency, sr, stft_size)
        .into_shape_with_order((batch, number_of_filters + 2))?;

    let n_freq = stft_size / 2 + 1;
    let mut fbanks = Array3::<f64>::zeros((batch, number_of_filters, n_freq));
    for (k, mut banks) in bins.outer_iter().zip(fbanks.outer_iter_mut()) {
        for (m, mut filter) in banks.outer_iter_mut().enumerate() {
            let center = k[m + 1];
            let onset = k[m].min(center - 1.0);
            let offset = k[m + 2].max(center + 1.0);
            for (idx, w) in filter.iter_mut().enumerate() {
                let idx = idx as f64;
                let rising = (idx - onset) / (center - onset);
                let falling = (idx - offset) / (center - offset);
                *w = rising.min(falling).max(0.0);
            }
        }
    }

    log::debug!(
        "built {number_of_filters} mel filters over {n_freq} bins \
         ({lowest_frequency}..{highest_frequency} Hz, size {size:?}, warped: {})",
        warping_fn.is_some()
    );

    let mut shape = size.to_vec();
    shape.extend([number_of_filters, n_freq]);
    Ok(fbanks.into_shape_with_order(IxDyn(&shape))?)
}

/// Scale every filter (last axis) to unit sum.
///
/// Rows are divided by `sum + eps`, which keeps all-zero rows finite.
pub fn normalize_rows<S, D>(fbanks: &ArrayBase<S, D>, eps: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = fbanks.to_owned();
    if out.ndim() == 0 {
        return out;
    }
    let last = Axis(out.ndim() - 1);
    for mut row in out.lanes_mut(last) {
        let total = row.sum() + eps;
        row.mapv_inplace(|v| v / total);
    }
    out
}

use crate::convert::{hz_to_mel, hz_to_mel_array, mel_to_hz_array};
use crate::utils::broadcast_shape;
use ndarray::{Array2, ArrayD, ArrayView1, ArrayViewD, IxDyn};

/// Largest amount by which `frequency` may exceed `max_frequency`.
const MAX_FREQUENCY_TOLERANCE: f64 = 1e-6;

/// Piecewise linear warping of frequencies in Hz (VTLP).
///
/// Below the breakpoint `bp = fhi_ratio * max_frequency * min(alpha, 1) / alpha`
/// every frequency is scaled by `alpha`. Above it a second linear segment
/// connects `(bp, alpha * bp)` to `(max_frequency, max_frequency)`, so the
/// top of the band stays in place. The breakpoint falls back to
/// `max_frequency` whenever `bp` or `alpha * bp` would exceed it.
///
/// `alpha` and `fhi_ratio` are broadcast against each other to a batch
/// shape `B`; the result has shape `(*B, frequency.len())`.
///
/// # Arguments
/// * `frequency` - Frequencies in Hz, ascending
/// * `alpha` - Stretch factors
/// * `fhi_ratio` - Breakpoint location as a fraction of `max_frequency`
/// * `max_frequency` - Upper band edge; defaults to the last frequency
///
/// # Errors
/// Fails if `frequency` is empty without an explicit `max_frequency`, if a
/// frequency exceeds `max_frequency`, or if `alpha` and `fhi_ratio` do not
/// broadcast.
///
/// # Example
/// ```
/// use melfbank::warping::hz_warping;
/// use ndarray::{arr0, array};
///
/// let f = array![0.0, 1000.0, 8000.0];
/// let alpha = arr0(1.1).into_dyn();
/// let ratio = arr0(0.6).into_dyn();
/// let w = hz_warping(f.view(), alpha.view(), ratio.view(), None).unwrap();
/// assert!((w[[1]] - 1100.0).abs() < 1e-9);
/// assert_eq!(w[[2]], 8000.0);
/// ```
pub fn hz_warping(
    frequency: ArrayView1<f64>,
    alpha: ArrayViewD<f64>,
    fhi_ratio: ArrayViewD<f64>,
    max_frequency: Option<f64>,
) -> crate::Result<ArrayD<f64>> {
    let max_frequency = match max_frequency.or_else(|| frequency.iter().next_back().copied()) {
        Some(f) => f,
        None => {
            return Err(crate::Error::InvalidSize {
                name: "frequency",
                value: 0,
                reason: "must be non-empty when max_frequency is not given",
            });
        }
    };
    let highest = frequency.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if highest - max_frequency >= MAX_FREQUENCY_TOLERANCE {
        return Err(crate::Error::InvalidParameter {
            name: "max_frequency",
            value: max_frequency.to_string(),
            reason: format!("must not be below the highest frequency {highest}"),
        });
    }

    let batch = broadcast_shape(alpha.shape(), fhi_ratio.shape())?;
    let batch_dim = IxDyn(&batch);
    let (alpha, fhi_ratio) = match (alpha.broadcast(batch_dim.clone()), fhi_ratio.broadcast(batch_dim)) {
        (Some(a), Some(r)) => (a, r),
        _ => {
            return Err(crate::Error::ShapeMismatch {
                expected: format!("{batch:?}"),
                got: format!("alpha {:?}, fhi_ratio {:?}", alpha.shape(), fhi_ratio.shape()),
            });
        }
    };

    let n = frequency.len();
    let mut warped = Array2::<f64>::zeros((alpha.len(), n));
    for ((&a, &r), mut row) in alpha.iter().zip(fhi_ratio.iter()).zip(warped.rows_mut()) {
        let mut breakpoint = r * max_frequency * a.min(1.0) / a;
        if breakpoint > max_frequency || a * breakpoint > max_frequency {
            breakpoint = max_frequency;
        }
        let bp_value = a * breakpoint;
        let slope = (max_frequency - bp_value) / (max_frequency - breakpoint);
        for (w, &f) in row.iter_mut().zip(frequency.iter()) {
            *w = if f > breakpoint {
                max_frequency + (f - max_frequency) * slope
            } else {
                a * f
            };
        }
    }

    let mut shape = batch;
    shape.push(n);
    Ok(warped.into_shape_with_order(IxDyn(&shape))?)
}

/// Piecewise linear warping performed on the mel scale.
///
/// Converts `frequency` (and `max_frequency`, if given) to mel, applies
/// [`hz_warping`] there and converts the result back to Hz.
pub fn mel_warping(
    frequency: ArrayView1<f64>,
    alpha: ArrayViewD<f64>,
    fhi_ratio: ArrayViewD<f64>,
    max_frequency: Option<f64>,
) -> crate::Result<ArrayD<f64>> {
    let mel = hz_to_mel_array(&frequency);
    let warped = hz_warping(mel.view(), alpha, fhi_ratio, max_frequency.map(hz_to_mel))?;
    Ok(mel_to_hz_array(&warped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::mel_frequencies;
    use approx::assert_relative_eq;
    use ndarray::{arr0, array};

    fn scalar(v: f64) -> ArrayD<f64> {
        arr0(v).into_dyn()
    }

    #[test]
    fn test_hz_warping_single_alpha() {
        let f = mel_frequencies(12, 0.0, 8000.0);
        let w = hz_warping(f.view(), scalar(1.1).view(), scalar(0.6).view(), None).unwrap();
        assert_eq!(w.shape(), &[12]);
        let expected = [
            0.0, 198.24120926, 447.52083027, 760.97901429, 1155.13892487, 1650.77771509,
            2274.02174313, 3057.7237579, 4043.19464944, 5185.90483925, 6432.48285284, 8000.0,
        ];
        for (a, b) in w.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hz_warping_batched_alpha() {
        let f = mel_frequencies(12, 0.0, 8000.0);
        let alpha = array![0.9, 1.1].into_dyn();
        let w = hz_warping(f.view(), alpha.view(), scalar(0.6).view(), None).unwrap();
        assert_eq!(w.shape(), &[2, 12]);
        let compressed = [
            0.0, 162.19735303, 366.15340659, 622.61919351, 945.11366581, 1350.63631234,
            1860.56324438, 2501.77398374, 3308.06834954, 4322.48927857, 5951.54009178, 8000.0,
        ];
        for (j, b) in compressed.iter().enumerate() {
            assert_relative_eq!(w[[0, j]], *b, epsilon = 1e-5);
        }
        assert_relative_eq!(w[[1, 9]], 5185.90483925, epsilon = 1e-5);
    }

    #[test]
    fn test_hz_warping_broadcast_shape() {
        let f = mel_frequencies(12, 0.0, 8000.0);
        let alpha = array![[0.9], [1.1]].into_dyn();
        let w = hz_warping(f.view(), alpha.view(), scalar(0.75).view(), None).unwrap();
        assert_eq!(w.shape(), &[2, 1, 12]);

        let ratio = array![0.6, 0.7, 0.8].into_dyn();
        let w = hz_warping(f.view(), alpha.view(), ratio.view(), None).unwrap();
        assert_eq!(w.shape(), &[2, 3, 12]);
    }

    #[test]
    fn test_hz_warping_pins_top_frequency() {
        let f = mel_frequencies(25, 0.0, 8000.0);
        for &a in &[0.8, 0.95, 1.0, 1.05, 1.3] {
            for &r in &[0.0, 0.3, 0.6, 0.9] {
                let w = hz_warping(f.view(), scalar(a).view(), scalar(r).view(), None).unwrap();
                assert_relative_eq!(w[[24]], 8000.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_hz_warping_breakpoint_clamped_to_max() {
        // bp = 1.5 * 8000 * 0.9 / 0.9 lies above the band, so it falls back
        // to the band edge and the whole axis is scaled by alpha.
        let f = mel_frequencies(12, 0.0, 8000.0);
        let w = hz_warping(f.view(), scalar(0.9).view(), scalar(1.5).view(), None).unwrap();
        for (a, b) in w.iter().zip(f.iter()) {
            assert_relative_eq!(*a, 0.9 * b, epsilon = 1e-9);
        }
        assert_relative_eq!(w[[11]], 7200.0, epsilon = 1e-6);
        assert!(w.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_hz_warping_identity_alpha() {
        let f = mel_frequencies(10, 50.0, 8000.0);
        let w = hz_warping(f.view(), scalar(1.0).view(), scalar(0.42).view(), Some(8000.0)).unwrap();
        for (a, b) in w.iter().zip(f.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_hz_warping_rejects_frequency_above_max() {
        let f = array![0.0, 1000.0, 9000.0];
        let err = hz_warping(f.view(), scalar(1.0).view(), scalar(0.5).view(), Some(8000.0));
        assert!(matches!(err, Err(crate::Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_hz_warping_incompatible_batch() {
        let f = array![0.0, 4000.0];
        let alpha = array![0.9, 1.0].into_dyn();
        let ratio = array![0.5, 0.6, 0.7].into_dyn();
        assert!(hz_warping(f.view(), alpha.view(), ratio.view(), None).is_err());
    }

    #[test]
    fn test_mel_warping_endpoints() {
        let f = mel_frequencies(12, 0.0, 8000.0);
        let alpha = array![0.9, 1.1].into_dyn();
        let w = mel_warping(f.view(), alpha.view(), scalar(0.7).view(), Some(8000.0)).unwrap();
        assert_eq!(w.shape(), &[2, 12]);
        for b in 0..2 {
            assert_relative_eq!(w[[b, 0]], 0.0, epsilon = 1e-9);
            assert_relative_eq!(w[[b, 11]], 8000.0, epsilon = 1e-6);
        }
        // scaled in mel, not in Hz
        let expected = crate::convert::mel_to_hz(0.9 * hz_to_mel(f[3]));
        assert_relative_eq!(w[[0, 3]], expected, epsilon = 1e-9);
    }
}

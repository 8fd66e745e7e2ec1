//! DC offset compensation and preemphasis.

/// Pole of the DC-blocking offset compensation filter.
pub const OFFSET_COMPENSATION_POLE: f32 = 0.999;

/// Offset compensation followed by preemphasis, as one IIR filter.
///
/// Equivalent to `lfilter([1, -(1 + factor), factor], [1, -0.999], y)`.
/// A factor of zero disables both stages and returns the input unchanged.
///
/// # Example
/// ```
/// use melfbank::effects::preemphasis_with_offset_compensation;
///
/// let y = vec![1.0f32; 4];
/// let out = preemphasis_with_offset_compensation(&y, 0.97);
/// assert_eq!(out[0], 1.0);
/// ```
pub fn preemphasis_with_offset_compensation(y: &[f32], factor: f32) -> Vec<f32> {
    if factor == 0.0 {
        return y.to_vec();
    }

    let b1 = -(1.0 + factor);
    let b2 = factor;
    let mut out = Vec::with_capacity(y.len());
    let (mut x1, mut x2) = (0.0f32, 0.0f32);
    let mut y1 = 0.0f32;
    for &sample in y {
        let filtered = sample + b1 * x1 + b2 * x2 + OFFSET_COMPENSATION_POLE * y1;
        out.push(filtered);
        x2 = x1;
        x1 = sample;
        y1 = filtered;
    }
    out
}

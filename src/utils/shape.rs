/// Compute the broadcast shape of two shapes (numpy rules).
///
/// Shapes are right-aligned; each pair of dimensions must be equal or one
/// of them must be 1.
///
/// # Example
/// ```
/// use melfbank::utils::broadcast_shape;
///
/// assert_eq!(broadcast_shape(&[2, 1], &[3]).unwrap(), vec![2, 3]);
/// assert!(broadcast_shape(&[2], &[3]).is_err());
/// ```
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> crate::Result<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0usize; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        out[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => {
                return Err(crate::Error::ShapeMismatch {
                    expected: format!("shape broadcastable with {a:?}"),
                    got: format!("{b:?}"),
                });
            }
        };
    }
    Ok(out)
}

/// Resolve possibly negative axis indices against `ndim` dimensions.
///
/// Every resolved axis must lie in `[0, ndim - 1)`, i.e. the last axis is
/// never allowed. On failure the original (unresolved) axes are reported.
pub fn normalize_axes(axes: &[isize], ndim: usize) -> crate::Result<Vec<usize>> {
    let resolved: Vec<isize> = axes
        .iter()
        .map(|&ax| if ax < 0 { ndim as isize + ax } else { ax })
        .collect();
    if resolved.iter().all(|&ax| ax >= 0 && ax < ndim as isize - 1) {
        Ok(resolved.into_iter().map(|ax| ax as usize).collect())
    } else {
        Err(crate::Error::InvalidAxis {
            axes: axes.to_vec(),
            ndim,
        })
    }
}

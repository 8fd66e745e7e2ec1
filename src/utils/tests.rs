use super::*;

#[test]
fn test_valid_audio() {
    assert!(valid_audio(&[0.0, 1.0, -1.0]).is_ok());
    assert!(matches!(valid_audio(&[]), Err(crate::Error::EmptyAudio)));
    assert!(matches!(
        valid_audio(&[0.0, f32::NAN]),
        Err(crate::Error::NonFiniteAudio)
    ));
    assert!(matches!(
        valid_audio(&[f32::INFINITY]),
        Err(crate::Error::NonFiniteAudio)
    ));
}

#[test]
fn test_broadcast_shape() {
    assert_eq!(broadcast_shape(&[], &[]).unwrap(), Vec::<usize>::new());
    assert_eq!(broadcast_shape(&[], &[2, 3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[2, 1], &[1, 3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[4, 1, 3], &[5, 1]).unwrap(), vec![4, 5, 3]);
    assert!(broadcast_shape(&[2, 3], &[3, 2]).is_err());
}

#[test]
fn test_normalize_axes() {
    assert_eq!(normalize_axes(&[0], 4).unwrap(), vec![0]);
    assert_eq!(normalize_axes(&[0, -2], 4).unwrap(), vec![0, 2]);
    // the last axis holds the spectral bins and is never independent
    assert!(normalize_axes(&[3], 4).is_err());
    assert!(normalize_axes(&[-1], 4).is_err());
    assert!(normalize_axes(&[-5], 4).is_err());

    match normalize_axes(&[0, 7], 3) {
        Err(crate::Error::InvalidAxis { axes, ndim }) => {
            assert_eq!(axes, vec![0, 7]);
            assert_eq!(ndim, 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

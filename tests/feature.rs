use melfbank::feature::fbank::{FbankConfig, fbank, logfbank};
use melfbank::window::WindowType;

fn chirp(sr: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            (2.0 * std::f32::consts::PI * (200.0 + 1500.0 * t) * t).sin()
        })
        .collect()
}

#[test]
fn fbank_default_shape() {
    let y = chirp(16000, 16000);
    let feats = fbank(&y, &FbankConfig::default()).unwrap();
    assert_eq!(feats.shape(), &[98, 23]);
    assert!(feats.iter().all(|&v| v >= 0.0));
}

#[test]
fn logfbank_matches_log_of_fbank() {
    let y = chirp(16000, 12000);
    let cfg = FbankConfig {
        number_of_filters: 40,
        ..FbankConfig::default()
    };
    let eps = 1e-10;
    let lin = fbank(&y, &cfg).unwrap();
    let log = logfbank(&y, &cfg, eps).unwrap();
    for (a, b) in lin.iter().zip(log.iter()) {
        assert_eq!((a + eps).ln(), *b);
    }
}

#[test]
fn logfbank_finite_on_silence() {
    let y = vec![0.0f32; 4000];
    let log = logfbank(&y, &FbankConfig::default(), 1e-18).unwrap();
    assert!(log.iter().all(|v| v.is_finite()));
}

#[test]
fn fbank_energy_scales_quadratically() {
    let y = chirp(16000, 8000);
    let y2: Vec<f32> = y.iter().map(|v| 2.0 * v).collect();
    let cfg = FbankConfig {
        window: WindowType::Blackman,
        ..FbankConfig::default()
    };
    let a = fbank(&y, &cfg).unwrap();
    let b = fbank(&y2, &cfg).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((4.0 * x - y).abs() <= 1e-3 * y.abs().max(1e-6));
    }
}

#[test]
fn fbank_signal_shorter_than_window() {
    let feats = fbank(&[0.1f32; 300], &FbankConfig::default()).unwrap();
    assert_eq!(feats.shape(), &[0, 23]);
}

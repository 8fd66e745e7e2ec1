//! Filterbank Feature Example
//!
//! This example extracts mel filterbank and log filterbank features from a
//! synthetic speech-like signal.

use log::info;
use melfbank::feature::fbank::{FbankConfig, fbank, logfbank};
use melfbank::window::WindowType;

fn main() {
    env_logger::init();
    info!("Filterbank Feature Example");

    // Generate a test signal: a 150 Hz pulse train with two formant-like tones
    let sr = 16000u32;
    let n = sr as usize * 2;
    let signal: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let pulse = if i % (sr as usize / 150) == 0 { 1.0 } else { 0.0 };
            pulse + 0.3 * (2.0 * std::f32::consts::PI * 700.0 * t).sin()
                + 0.2 * (2.0 * std::f32::consts::PI * 1200.0 * t).sin()
        })
        .collect();
    info!("Generated {} samples", signal.len());

    // Default speech front end: 25 ms / 10 ms, 23 filters
    let cfg = FbankConfig::default();
    let feats = fbank(&signal, &cfg).unwrap();
    info!("fbank shape: {:?}", feats.shape());

    let mean_energy: Vec<f32> = feats
        .columns()
        .into_iter()
        .map(|c| c.sum() / c.len() as f32)
        .collect();
    for (m, e) in mean_energy.iter().enumerate().take(8) {
        info!("  filter {:2}: mean energy {:.5}", m, e);
    }

    // Log features with 40 filters, Hann window, and denoising
    let cfg = FbankConfig {
        number_of_filters: 40,
        window: WindowType::Hann,
        denoise: true,
        ..FbankConfig::default()
    };
    let log_feats = logfbank(&signal, &cfg, 1e-18).unwrap();
    info!("logfbank shape: {:?}", log_feats.shape());
}

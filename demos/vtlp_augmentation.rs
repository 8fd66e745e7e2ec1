//! VTLP Augmentation Example
//!
//! This example applies vocal tract length perturbation to a batch of
//! spectrograms: every utterance in the batch is mapped through its own
//! randomly warped mel filterbank.

use log::info;
use melfbank::spectrum::{StftConfig, stft, stft_to_spectrogram};
use melfbank::transform::{MelConfig, MelTransform};
use melfbank::warping::{HzWarping, MelWarping, Uniform};
use ndarray::{Array3, Axis};

fn main() {
    env_logger::init();
    info!("VTLP Augmentation Example");

    let sr = 16000u32;
    let batch = 4;
    let cfg = StftConfig::default();

    // One tone per utterance
    let spectrograms: Vec<_> = (0..batch)
        .map(|b| {
            let freq = 300.0 + 400.0 * b as f32;
            let y: Vec<f32> = (0..sr as usize)
                .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
                .collect();
            stft_to_spectrogram(&stft(&y, &cfg).unwrap())
        })
        .collect();
    let (frames, bins) = spectrograms[0].dim();
    let mut x = Array3::<f32>::zeros((batch, frames, bins));
    for (mut dst, src) in x.outer_iter_mut().zip(spectrograms.iter()) {
        dst.assign(src);
    }
    info!("Batch spectrogram shape: {:?}", x.shape());

    let plain = MelTransform::new(MelConfig::new(sr, cfg.size, 40));
    let reference = plain.forward(x.view().into_dyn()).unwrap();

    let hz = MelTransform::new(MelConfig::new(sr, cfg.size, 40)).with_warping(HzWarping::new(
        Uniform::seeded(0.9, 1.1, 0).unwrap(),
        Uniform::seeded(0.6, 0.7, 1).unwrap(),
    ));
    let mel = MelTransform::new(MelConfig::new(sr, cfg.size, 40)).with_warping(MelWarping::new(
        Uniform::seeded(0.9, 1.1, 2).unwrap(),
        Uniform::seeded(0.6, 0.7, 3).unwrap(),
    ));

    for (name, transform) in [("hz", &hz), ("mel", &mel)] {
        let warped = transform.forward(x.view().into_dyn()).unwrap();
        for b in 0..batch {
            let diff = (&warped.index_axis(Axis(0), b) - &reference.index_axis(Axis(0), b))
                .mapv(f32::abs)
                .mean()
                .unwrap_or(0.0);
            info!("{} warping, utterance {}: mean |delta log-mel| = {:.4}", name, b, diff);
        }
    }

    let rec = plain.inverse(reference.view()).unwrap();
    info!("Reconstructed spectrogram shape: {:?}", rec.shape());
}

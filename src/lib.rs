//! Mel filterbank features for speech processing.
//!
//! Melfbank maps linear-frequency spectrograms onto a bank of triangular
//! filters spaced on the (HTK) mel scale, optionally with random
//! piecewise-linear frequency warping of the filter centers (vocal tract
//! length perturbation, VTLP) as data augmentation.
//!
//! # Quick Start
//!
//! ```rust
//! use melfbank::feature::fbank::{FbankConfig, logfbank};
//! use melfbank::transform::{MelConfig, MelTransform};
//! use ndarray::ArrayD;
//!
//! // 1 second of a 440 Hz tone at 16 kHz
//! let y: Vec<f32> = (0..16000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
//!     .collect();
//! let feats = logfbank(&y, &FbankConfig::default(), 1e-18).unwrap();
//! assert_eq!(feats.shape(), &[98, 23]);
//!
//! // Log mel spectrogram of a batch of spectrograms
//! let mel = MelTransform::new(MelConfig::new(16000, 512, 40));
//! let spec = ArrayD::<f32>::zeros(vec![4, 100, 257]);
//! assert_eq!(mel.forward(spec.view()).unwrap().shape(), &[4, 100, 40]);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`convert`] | Hz/mel/FFT-bin conversions |
//! | [`filterbank`] | Triangular (optionally warped) mel filterbanks |
//! | [`warping`] | Hz- and mel-domain piecewise linear warping, samplers |
//! | [`transform`] | [`MelTransform`](transform::MelTransform) forward/inverse mapping |
//! | [`feature`] | `fbank` / `logfbank` feature extraction |
//! | [`spectrum`] | STFT and power spectrogram |
//! | [`effects`] | Preemphasis and offset compensation |
//! | [`window`] | Window functions (Hann, Hamming, Blackman) |
//! | [`utils`] | Validation and shape helpers |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`.
//!
//! # Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade; install
//! any logger (e.g. `env_logger`) to see them.
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `parallel` | Compute STFT frames in parallel with rayon |

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod convert;
pub mod effects;
pub mod feature;
pub mod filterbank;
pub mod spectrum;
pub mod transform;
pub mod utils;
pub mod warping;
pub mod window;

/// Crate-level error type for mel filterbank computations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required dimension is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// Audio data is empty when a non-empty signal was required.
    #[error("audio data is empty")]
    EmptyAudio,

    /// Audio data contains non-finite values (NaN or Inf).
    #[error("audio data contains non-finite values")]
    NonFiniteAudio,

    /// Input array has incorrect shape for the operation.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Independent axes outside of `[0, ndim - 1)`.
    #[error("independent axes {axes:?} out of range for input with {ndim} dimensions")]
    InvalidAxis { axes: Vec<isize>, ndim: usize },

    /// Array reshaping failed.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    /// A real FFT was handed buffers that do not match its plan.
    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),

    /// The SVD-based pseudo-inverse could not be computed.
    #[error("pseudo-inverse failed: {0}")]
    PseudoInverse(String),
}

/// Convenience Result type for melfbank operations.
pub type Result<T> = std::result::Result<T, Error>;

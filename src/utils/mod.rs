mod shape;
mod validation;

// Shape helpers: broadcasting and axis normalization
pub use shape::{broadcast_shape, normalize_axes};

// Validation operations
pub use validation::valid_audio;

#[cfg(test)]
mod tests;

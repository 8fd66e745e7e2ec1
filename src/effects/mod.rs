//! Time-domain filters applied before spectral analysis.

mod preemphasis;

pub use preemphasis::{OFFSET_COMPENSATION_POLE, preemphasis_with_offset_compensation};

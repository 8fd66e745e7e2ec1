//! Feature extraction recipes built on the mel transform.

pub mod fbank;

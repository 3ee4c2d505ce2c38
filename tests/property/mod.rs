//! Property-based tests

pub mod codec_proptest;
pub mod registry_proptest;

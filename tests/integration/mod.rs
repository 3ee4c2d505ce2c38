//! Integration tests against the assembled router

pub mod daemon;
pub mod notifications;
pub mod socket;

//! Runtime configuration models.

#[cfg(feature = "http")]
pub mod config;

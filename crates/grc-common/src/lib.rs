//! grcmap common types, settings, and errors.
//!
//! This crate provides foundational types shared across grcmap crates:
//! - Unified error type with stable error codes
//! - Storage settings (data directory layout)

pub mod error;
pub mod settings;

pub use error::{Error, Result};
pub use settings::{Settings, StorageSettings};

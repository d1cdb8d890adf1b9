//! Error Types
//!
//! This module defines the error types used throughout the bridge.
//!
//! # Overview
//!
//! The main error type [`Error`] covers all failure modes including:
//! - Host and rule engine calls returning a non-success status
//! - Internal invariant violations (e.g. a rule attribute that must exist)
//! - Malformed geometry handed over by the engine
//! - Filesystem and configuration errors
//!
//! Recoverable failures (asset cache writes, malformed colors, unsupported
//! enum sources) are logged and replaced by a safe default instead of being
//! surfaced through this type.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use cga_bridge::errors::{Error, Result};
//!
//! fn create_mesh() -> Result<()> {
//!     Err(Error::external("create mesh", "kFailure"))
//! }
//! ```

use thiserror::Error;

/// The main error type for the bridge.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // External Call Errors
    // ========================================================================
    /// A host or rule engine call returned a non-success status.
    #[error("External call '{call}' failed: {status}")]
    ExternalCall {
        /// Name of the failing call
        call: String,
        /// Status description reported by the callee
        status: String,
    },

    // ========================================================================
    // Invariant & Data Errors
    // ========================================================================
    /// An internal invariant does not hold (programmer or data error).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A rule attribute lookup that must always succeed failed.
    #[error("Rule attribute not found: {0}")]
    RuleAttributeNotFound(String),

    /// The engine produced geometry that breaks the face/index contract.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // ========================================================================
    // Package & I/O Errors
    // ========================================================================
    /// A rule package could not be found or stat'ed.
    #[error("Rule package not found: {0}")]
    PackageNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Builds an [`Error::ExternalCall`] from a call name and a status description.
    pub fn external(call: impl Into<String>, status: impl std::fmt::Display) -> Self {
        Error::ExternalCall {
            call: call.into(),
            status: status.to_string(),
        }
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

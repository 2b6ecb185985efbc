//! Error Types
//!
//! This module defines the error type shared by every stage of the viewer.
//!
//! # Overview
//!
//! [`StageError`] covers:
//! - Asset I/O (local files and HTTP)
//! - glTF parsing and malformed asset contents
//! - Configuration and catalog problems
//! - Windowing failures of the viewer shell
//!
//! Whether an error is *recoverable* (a single clip is skipped) or *fatal to
//! the current load* (the model mesh is missing) is decided by the caller, not
//! by the variant: the same I/O error is logged and skipped for a clip but
//! aborts the load for a model.
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, StageError>`.

use thiserror::Error;

/// The main error type for the avatar stage.
#[derive(Error, Debug)]
pub enum StageError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset was read but its contents are not usable.
    #[error("Malformed asset {path}: {reason}")]
    MalformedAsset {
        /// Asset path relative to the resource root
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// The asset parsed fine but carries no animation.
    #[error("No animation found in {0}")]
    NoAnimation(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // HTTP & Network Errors
    // ========================================================================
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// URL parsing error.
    #[cfg(feature = "http")]
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    HttpResponseError {
        /// HTTP status code
        status: u16,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration values that parse but cannot be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model catalog has no entries.
    #[error("Model catalog is empty")]
    EmptyCatalog,

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// Feature not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),
}

/// Alias for `Result<T, StageError>`.
pub type Result<T> = std::result::Result<T, StageError>;

//! Loader error types.

use thiserror::Error;

/// Errors surfaced by the plugin loader.
///
/// Every operation either succeeds immediately or fails immediately with
/// one of these kinds; there is no internal retry or partial success.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The library path does not name an existing file.
    #[error("plugin library not found: {0}")]
    NotFound(String),

    /// Instantiation failed: type missing, no matching public
    /// constructor, the constructor rejected its arguments, or the
    /// constructed instance did not satisfy the requested capability.
    #[error("cannot create plugin type: {0}")]
    CannotCreate(String),

    /// The library loaded but is not a valid plugin (entry point missing,
    /// ABI mismatch, malformed manifest).
    #[error("invalid plugin manifest: {0}")]
    InvalidManifest(String),

    /// Operation on a plugin handle that has been disposed.
    #[error("plugin handle has been disposed")]
    Disposed,

    /// Operation on a load scope that has been revoked.
    #[error("load scope has been revoked")]
    Revoked,

    /// Unrecoverable host environment failure.
    #[error("environment error: {0}")]
    Environment(String),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, PluginError>;

//! Crate error type.
//!
//! Only unrecoverable failures surface as [`Error`]. Malformed input, empty
//! regions and failing handlers are absorbed where they happen.

use std::io;

/// Errors returned by termloom operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing to or configuring the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The terminal could not be prepared for interactive use.
    #[error("terminal setup failed: {0}")]
    Setup(String),

    /// A top-level component with this id is already registered.
    #[error("component `{0}` is already registered")]
    DuplicateComponent(String),

    /// No top-level component with this id is registered.
    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    /// A node handle refers to a component that has been removed.
    #[error("component handle no longer refers to a live node")]
    StaleNode,

    /// A reparent would make a node its own ancestor.
    #[error("moving a node under its own descendant would create a cycle")]
    Cycle,

    /// A key name could not be parsed.
    #[error("unknown key name `{0}`")]
    UnknownKey(String),

    /// A style description could not be parsed.
    #[error("invalid style `{0}`")]
    InvalidStyle(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by user-supplied key and notification handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by user-supplied handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

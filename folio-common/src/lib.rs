//! Shared error type and observability helpers for the Folio crates.
//!
//! Every crate in the workspace depends on this one, so it stays small:
//!
//! - [`observability`]: tracing/logging initialisation for binaries and tests
//! - [`FolioError`] and [`Result`]: errors that cross crate boundaries
//!
//! # Examples
//!
//! ```rust
//! use folio_common::FolioError;
//!
//! let err = FolioError::Navigation("no opener available".into());
//! assert_eq!(err.to_string(), "no opener available");
//! ```

pub mod observability;

/// Errors surfaced by the Folio libraries.
#[derive(thiserror::Error, Debug)]
pub enum FolioError {
    /// The host could not open a URL. The message is shown to the user verbatim.
    #[error("{0}")]
    Navigation(String),

    /// The controlling terminal could not be set up or restored.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Convenient alias for results that use [`FolioError`].
pub type Result<T> = std::result::Result<T, FolioError>;

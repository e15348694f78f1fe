// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in fileio return `error::Result<T>`.  Every variant
// is terminal for the operation it occurs in; nothing is retried.  `main`
// logs the message and turns it into a process exit status.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::platform::{Direction, OpenMode};

/// Exit status for a failed create-for-write or open-for-read.
pub(crate) const EXIT_HANDLE_INVALID: u8 = 1;
/// Exit status for every other failure.
pub(crate) const EXIT_FAILURE: u8 = 2;

/// Every error that fileio can produce.
#[derive(Debug, Error)]
pub(crate) enum FileIoError {
    /// A capability module (DLL) could not be loaded.
    #[error("failed to load {module}: {source}")]
    ModuleLoadFailed {
        module: String,
        #[source]
        source: io::Error,
    },

    /// The module loaded but does not export the requested entry point.
    #[error("failed to resolve {symbol} in {module}")]
    SymbolResolutionFailed { module: String, symbol: String },

    /// Opening or creating the file did not yield a usable handle.
    #[error("failed to open {} ({mode}): {source}", .path.display())]
    HandleInvalid {
        path: PathBuf,
        mode: OpenMode,
        #[source]
        source: io::Error,
    },

    /// The handle was valid but the read or write itself failed.
    #[error("file {direction} failed: {source}")]
    TransferFailed {
        direction: Direction,
        #[source]
        source: io::Error,
    },

    /// The bytes read back are not valid UTF-8 text.
    #[error("file contents are not valid text: {0}")]
    DecodeFailed(#[from] std::str::Utf8Error),

    /// A payload larger than the transfer buffer.
    #[error("payload of {len} bytes does not fit a {capacity}-byte buffer")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),
}

impl FileIoError {
    /// Process exit status reported for this error.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::HandleInvalid { .. } => EXIT_HANDLE_INVALID,
            _ => EXIT_FAILURE,
        }
    }

    /// Build a `TransferFailed` from a raw OS error code (`GetLastError()`).
    #[cfg(any(windows, test))]
    pub(crate) fn transfer_os(direction: Direction, code: u32) -> Self {
        Self::TransferFailed {
            direction,
            source: io::Error::from_raw_os_error(code as i32),
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, FileIoError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

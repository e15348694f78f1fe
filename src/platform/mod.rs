// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of the codebase uses to
// talk to the OS.  No `unsafe` lives here; all Win32 FFI is confined to the
// `win32` sub-module and never leaks outward.
//
// A provider loads its capabilities on demand: `load_files` / `load_display`
// acquire a module and resolve its entry points, and the value they return
// owns that module.  Dropping it releases the module, so each top-level
// operation gets a fresh module and gives it back before returning.

use std::{fmt, path::Path};

#[cfg(any(windows, test))]
use log::{log, Level};

use crate::{error::Result, transfer::ByteBuffer};

pub mod stream;
#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod fake;

// ── Modes ─────────────────────────────────────────────────────────────────────

/// How `open_or_create` treats the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenMode {
    /// Open for reading; the file must already exist.
    ReadExisting,
    /// Open for writing; create the file or truncate it if present.
    CreateAlways,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadExisting => "read existing",
            Self::CreateAlways => "create always",
        })
    }
}

/// Which way bytes move between the buffer and the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

// ── Status lines ──────────────────────────────────────────────────────────────
//
// Providers report each module they load and each entry point they resolve,
// one line per step, alongside the transfer and dialog lines.

/// Level of the load and resolve status lines.
#[cfg(any(windows, test))]
pub(crate) const STATUS_LEVEL: Level = Level::Info;

#[cfg(any(windows, test))]
pub(crate) fn report_loaded(module: &str) {
    log!(STATUS_LEVEL, "Loaded {module}.");
}

#[cfg(any(windows, test))]
pub(crate) fn report_resolved(symbol: &str, module: &str) {
    log!(STATUS_LEVEL, "Resolved {symbol} in {module}.");
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Resolved file entry points.
pub(crate) trait FileSystemApi {
    type Handle;

    /// Open or create `path`.  Fails with `HandleInvalid`.
    fn open_or_create(&self, path: &Path, mode: OpenMode) -> Result<Self::Handle>;

    /// Move bytes between `buffer` and the file.
    ///
    /// A read fills `buffer.read_window()` and records the count with
    /// `set_len`; a write sends `buffer.as_bytes()`.  Returns the number of
    /// bytes transferred.  Fails with `TransferFailed`.
    fn transfer(
        &self,
        handle: &mut Self::Handle,
        buffer: &mut ByteBuffer,
        direction: Direction,
    ) -> Result<usize>;

    /// Release the handle.  Consumes it so it cannot be closed twice.
    fn close(&self, handle: Self::Handle);
}

/// Resolved dialog entry point.
pub(crate) trait DisplayApi {
    /// Show `text` with an OK/Cancel option set and return the raw choice
    /// code (`IDOK`, `IDCANCEL`, or 0 if the dialog could not be shown).
    fn show(&self, text: &str, title: &str) -> i32;
}

/// Loads capabilities on demand.
pub(crate) trait CapabilityProvider {
    type Files: FileSystemApi;
    type Display: DisplayApi;

    /// Acquire the file module and resolve its entry points.
    fn load_files(&self) -> Result<Self::Files>;

    /// Acquire the dialog module and resolve its entry point.
    fn load_display(&self) -> Result<Self::Display>;
}

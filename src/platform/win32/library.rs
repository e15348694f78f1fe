// ── Capability modules ────────────────────────────────────────────────────────
//
// `Library` owns one `LoadLibraryExW` reference.  `FreeLibrary` runs in
// `Drop`, so the module is released exactly once on every path out of the
// function that loaded it, including early `?` returns while resolving.
//
// ── Security note ─────────────────────────────────────────────────────────────
//
// Modules are loaded with `LOAD_LIBRARY_SEARCH_SYSTEM32`: only the system
// directory is searched, never the application directory, the working
// directory or `PATH`.

#![allow(unsafe_code)]

use std::ffi::CString;

use log::debug;
use windows::{
    core::{PCSTR, PCWSTR},
    Win32::{
        Foundation::{HANDLE, HMODULE},
        System::LibraryLoader::{
            FreeLibrary, GetProcAddress, LoadLibraryExW, LOAD_LIBRARY_SEARCH_SYSTEM32,
        },
    },
};

use super::{os_error, to_wide};
use crate::{
    error::{FileIoError, Result},
    platform::{report_loaded, report_resolved},
};

/// Untyped entry point as returned by `GetProcAddress`.
///
/// Callers transmute it to the real signature; the pointer is only valid
/// while the `Library` it came from is alive.
pub(crate) type RawEntryPoint = unsafe extern "system" fn() -> isize;

/// RAII handle to a loaded system DLL.
pub(crate) struct Library {
    handle: HMODULE,
    name: &'static str,
}

impl Library {
    /// Load `name` from the system directory.
    pub(crate) fn acquire(name: &'static str) -> Result<Self> {
        let wide = to_wide(name);
        // SAFETY: `wide` is a valid null-terminated UTF-16 string that outlives
        // the call.  The null file handle is required by LoadLibraryExW.
        let handle = unsafe {
            LoadLibraryExW(
                PCWSTR(wide.as_ptr()),
                HANDLE::default(),
                LOAD_LIBRARY_SEARCH_SYSTEM32,
            )
        }
        .map_err(|e| FileIoError::ModuleLoadFailed {
            module: name.to_owned(),
            source: os_error(&e),
        })?;

        report_loaded(name);
        Ok(Self { handle, name })
    }

    #[cfg(test)]
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve an exported function by name.
    pub(crate) fn entry_point(&self, symbol: &str) -> Result<RawEntryPoint> {
        let unresolved = || FileIoError::SymbolResolutionFailed {
            module: self.name.to_owned(),
            symbol: symbol.to_owned(),
        };
        let c_symbol = CString::new(symbol).map_err(|_| unresolved())?;

        // SAFETY: self.handle is a live module (not yet freed; we hold the only
        // reference).  c_symbol is a valid null-terminated ANSI string that
        // outlives the call.
        let proc = unsafe { GetProcAddress(self.handle, PCSTR(c_symbol.as_ptr().cast())) };

        let entry = proc.ok_or_else(unresolved)?;
        report_resolved(symbol, self.name);
        Ok(entry)
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        // SAFETY: self.handle was returned by a successful LoadLibraryExW and
        // has not been freed since.  Entry points resolved from it are stored
        // only in structs that own this Library, so none outlive it.
        unsafe {
            let _ = FreeLibrary(self.handle);
        }
        debug!("released {}", self.name);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

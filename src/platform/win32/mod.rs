// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod consts; // raw Win32 constants passed through resolved entry points
pub(crate) mod kernel32; // CreateFileW / ReadFile / WriteFile / CloseHandle
pub(crate) mod library; // LoadLibraryExW + GetProcAddress RAII wrapper
pub(crate) mod linked; // statically linked MessageBoxW (stream variant)
pub(crate) mod user32; // MessageBoxW resolved at runtime

use std::{ffi::OsStr, io, os::windows::ffi::OsStrExt};

use crate::{error::Result, platform::CapabilityProvider};

pub(crate) use kernel32::Kernel32;
pub(crate) use user32::User32;

// ── Provider ──────────────────────────────────────────────────────────────────

/// Native provider: every capability comes from a system DLL loaded for the
/// duration of one operation.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Win32Provider;

impl CapabilityProvider for Win32Provider {
    type Files = Kernel32;
    type Display = User32;

    fn load_files(&self) -> Result<Kernel32> {
        Kernel32::load()
    }

    fn load_display(&self) -> Result<User32> {
        User32::load()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Encode `s` as a null-terminated UTF-16 string.
pub(crate) fn to_wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref().encode_wide().chain(std::iter::once(0)).collect()
}

/// Recover the Win32 error code from a windows-crate HRESULT error.
///
/// Win32 failures surface as `HRESULT_FROM_WIN32` values (0x8007xxxx); the
/// low word is the original `GetLastError()` code.
pub(crate) fn os_error(e: &windows::core::Error) -> io::Error {
    io::Error::from_raw_os_error(e.code().0 & 0xFFFF)
}

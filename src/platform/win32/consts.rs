// ── Raw Win32 constants ───────────────────────────────────────────────────────
//
// Source of truth: fileapi.h, winnt.h, winuser.h.
// The resolved entry points take plain integers, so these are `u32`/`i32`
// rather than the windows-crate newtypes.

// ── CreateFileW ───────────────────────────────────────────────────────────────

pub(super) const GENERIC_READ: u32 = 0x8000_0000;
pub(super) const GENERIC_WRITE: u32 = 0x4000_0000;
/// Other openers may read while we hold the file.
pub(super) const FILE_SHARE_READ: u32 = 0x0000_0001;
/// Exclusive access.
pub(super) const FILE_SHARE_NONE: u32 = 0;
/// Create, truncating any existing file.
pub(super) const CREATE_ALWAYS: u32 = 2;
/// Fail unless the file exists.
pub(super) const OPEN_EXISTING: u32 = 3;
pub(super) const FILE_ATTRIBUTE_NORMAL: u32 = 0x0000_0080;

// ── MessageBoxW ───────────────────────────────────────────────────────────────

pub(super) const MB_OKCANCEL: u32 = 0x0000_0001;
pub(super) const MB_ICONINFORMATION: u32 = 0x0000_0040;

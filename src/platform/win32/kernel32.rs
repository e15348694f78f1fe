// ── kernel32 file entry points ────────────────────────────────────────────────
//
// `Kernel32` is a capability loaded for exactly one file operation.  It owns
// the `Library` and the four entry points resolved from it; dropping it frees
// the module.

#![allow(unsafe_code)]

use std::{ffi::c_void, path::Path, ptr};

use log::debug;
use windows::{
    core::PCWSTR,
    Win32::Foundation::{GetLastError, BOOL, HANDLE, INVALID_HANDLE_VALUE},
};

use super::{
    consts::{
        CREATE_ALWAYS, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_NONE, FILE_SHARE_READ, GENERIC_READ,
        GENERIC_WRITE, OPEN_EXISTING,
    },
    library::{Library, RawEntryPoint},
    to_wide,
};
use crate::{
    error::{FileIoError, Result},
    platform::{Direction, FileSystemApi, OpenMode},
    transfer::ByteBuffer,
};

const MODULE: &str = "kernel32.dll";

// ── Entry point signatures ────────────────────────────────────────────────────

type CreateFileWFn = unsafe extern "system" fn(
    PCWSTR,        // lpFileName
    u32,           // dwDesiredAccess
    u32,           // dwShareMode
    *const c_void, // lpSecurityAttributes
    u32,           // dwCreationDisposition
    u32,           // dwFlagsAndAttributes
    HANDLE,        // hTemplateFile
) -> HANDLE;

type ReadFileFn = unsafe extern "system" fn(
    HANDLE,      // hFile
    *mut c_void, // lpBuffer
    u32,         // nNumberOfBytesToRead
    *mut u32,    // lpNumberOfBytesRead
    *mut c_void, // lpOverlapped
) -> BOOL;

type WriteFileFn = unsafe extern "system" fn(
    HANDLE,        // hFile
    *const c_void, // lpBuffer
    u32,           // nNumberOfBytesToWrite
    *mut u32,      // lpNumberOfBytesWritten
    *mut c_void,   // lpOverlapped
) -> BOOL;

type CloseHandleFn = unsafe extern "system" fn(HANDLE) -> BOOL;

// ── Kernel32 ──────────────────────────────────────────────────────────────────

/// File entry points resolved from `kernel32.dll`.
pub(crate) struct Kernel32 {
    create_file: CreateFileWFn,
    read_file: ReadFileFn,
    write_file: WriteFileFn,
    close_handle: CloseHandleFn,
    // Keeps the entry points above valid; freed when Kernel32 drops.
    _module: Library,
}

/// An open file handle produced by `Kernel32::open_or_create`.
#[derive(Debug)]
pub(crate) struct Win32File(HANDLE);

impl Kernel32 {
    /// Load `kernel32.dll` and resolve the file entry points.
    ///
    /// If any symbol is missing the partially built value is never created and
    /// `module` drops here, releasing the DLL.
    pub(crate) fn load() -> Result<Self> {
        let module = Library::acquire(MODULE)?;

        let create_file = module.entry_point("CreateFileW")?;
        let read_file = module.entry_point("ReadFile")?;
        let write_file = module.entry_point("WriteFile")?;
        let close_handle = module.entry_point("CloseHandle")?;

        // SAFETY: each pointer was exported by kernel32.dll under the name we
        // looked up, and the signatures above match the documented Win32
        // prototypes (all `WINAPI`, i.e. `extern "system"`).  Function
        // pointers of any signature share one representation.
        unsafe {
            Ok(Self {
                create_file: std::mem::transmute::<RawEntryPoint, CreateFileWFn>(create_file),
                read_file: std::mem::transmute::<RawEntryPoint, ReadFileFn>(read_file),
                write_file: std::mem::transmute::<RawEntryPoint, WriteFileFn>(write_file),
                close_handle: std::mem::transmute::<RawEntryPoint, CloseHandleFn>(close_handle),
                _module: module,
            })
        }
    }
}

impl FileSystemApi for Kernel32 {
    type Handle = Win32File;

    fn open_or_create(&self, path: &Path, mode: OpenMode) -> Result<Win32File> {
        let (access, share, disposition) = match mode {
            OpenMode::ReadExisting => (GENERIC_READ, FILE_SHARE_READ, OPEN_EXISTING),
            OpenMode::CreateAlways => (GENERIC_WRITE, FILE_SHARE_NONE, CREATE_ALWAYS),
        };
        let wide = to_wide(path);

        // SAFETY: `wide` is a null-terminated UTF-16 path that outlives the
        // call; null security attributes and template handle are documented
        // defaults.  create_file is valid while self._module is alive.
        let handle = unsafe {
            (self.create_file)(
                PCWSTR(wide.as_ptr()),
                access,
                share,
                ptr::null(),
                disposition,
                FILE_ATTRIBUTE_NORMAL,
                HANDLE::default(),
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            // SAFETY: GetLastError reads thread-local state set by the just-
            // failed CreateFileW; no Win32 calls between them.
            let code = unsafe { GetLastError().0 };
            return Err(FileIoError::HandleInvalid {
                path: path.to_path_buf(),
                mode,
                source: std::io::Error::from_raw_os_error(code as i32),
            });
        }

        debug!("opened {} ({mode})", path.display());
        Ok(Win32File(handle))
    }

    fn transfer(
        &self,
        handle: &mut Win32File,
        buffer: &mut ByteBuffer,
        direction: Direction,
    ) -> Result<usize> {
        let mut count: u32 = 0;

        let ok = match direction {
            Direction::Read => {
                let window = buffer.read_window();
                // Windows past 4 GiB are clamped to one ReadFile's maximum.
                let len = u32::try_from(window.len()).unwrap_or(u32::MAX);
                // SAFETY: handle.0 is an open handle with GENERIC_READ; `window`
                // is writable for `len` bytes and `count` outlives the call.
                // Synchronous I/O, so no OVERLAPPED.
                unsafe {
                    (self.read_file)(
                        handle.0,
                        window.as_mut_ptr().cast(),
                        len,
                        &mut count,
                        ptr::null_mut(),
                    )
                }
            }
            Direction::Write => {
                let bytes = buffer.as_bytes();
                let len = u32::try_from(bytes.len()).map_err(|_| FileIoError::CapacityExceeded {
                    len: bytes.len(),
                    capacity: u32::MAX as usize,
                })?;
                // SAFETY: handle.0 is an open handle with GENERIC_WRITE; `bytes`
                // is readable for `len` bytes and `count` outlives the call.
                unsafe {
                    (self.write_file)(
                        handle.0,
                        bytes.as_ptr().cast(),
                        len,
                        &mut count,
                        ptr::null_mut(),
                    )
                }
            }
        };

        if !ok.as_bool() {
            // SAFETY: reads the error left by the failed ReadFile/WriteFile.
            let code = unsafe { GetLastError().0 };
            return Err(FileIoError::transfer_os(direction, code));
        }

        let count = count as usize;
        if direction == Direction::Read {
            buffer.set_len(count);
        }
        Ok(count)
    }

    fn close(&self, handle: Win32File) {
        // SAFETY: handle.0 came from CreateFileW and is closed only here; the
        // Win32File is consumed, so no second close is possible.
        unsafe {
            let _ = (self.close_handle)(handle.0);
        }
        debug!("closed file handle");
    }
}

// ── Stream provider ───────────────────────────────────────────────────────────
//
// The high-level variant: the same write / read / show sequence expressed
// with `std::fs::File`, which performs the Win32 calls for us.  No module is
// loaded by hand, so `load_files` cannot fail.
// No `unsafe` — pure safe Rust.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::Path,
};

use log::debug;

use crate::{
    error::{FileIoError, Result},
    platform::{CapabilityProvider, Direction, FileSystemApi, OpenMode},
    transfer::ByteBuffer,
};

/// Provider backed by the standard library's file streams.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StreamProvider;

/// `std::fs` file operations.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StreamFiles;

impl CapabilityProvider for StreamProvider {
    type Files = StreamFiles;
    #[cfg(windows)]
    type Display = super::win32::linked::LinkedMessageBox;
    #[cfg(not(windows))]
    type Display = NoDisplay;

    fn load_files(&self) -> Result<StreamFiles> {
        Ok(StreamFiles)
    }

    #[cfg(windows)]
    fn load_display(&self) -> Result<Self::Display> {
        Ok(super::win32::linked::LinkedMessageBox)
    }

    #[cfg(not(windows))]
    fn load_display(&self) -> Result<Self::Display> {
        Err(FileIoError::ModuleLoadFailed {
            module: "user32.dll".to_owned(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "message boxes are only available on Windows",
            ),
        })
    }
}

impl FileSystemApi for StreamFiles {
    type Handle = File;

    fn open_or_create(&self, path: &Path, mode: OpenMode) -> Result<File> {
        let opened = match mode {
            OpenMode::ReadExisting => File::open(path),
            OpenMode::CreateAlways => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path),
        };
        let file = opened.map_err(|source| FileIoError::HandleInvalid {
            path: path.to_path_buf(),
            mode,
            source,
        })?;
        debug!("opened {} ({mode})", path.display());
        Ok(file)
    }

    fn transfer(
        &self,
        handle: &mut File,
        buffer: &mut ByteBuffer,
        direction: Direction,
    ) -> Result<usize> {
        let failed = |source| FileIoError::TransferFailed { direction, source };
        match direction {
            Direction::Read => {
                // One read into the window, never read_to_end: the last byte stays reserved for the terminator.
                let n = handle.read(buffer.read_window()).map_err(failed)?;
                buffer.set_len(n);
                Ok(n)
            }
            Direction::Write => {
                handle.write_all(buffer.as_bytes()).map_err(failed)?;
                handle.flush().map_err(failed)?;
                Ok(buffer.len())
            }
        }
    }

    fn close(&self, handle: File) {
        drop(handle);
        debug!("closed file handle");
    }
}

/// Display capability on targets without a message box.  Uninhabited:
/// `load_display` never produces one.
#[cfg(not(windows))]
#[derive(Debug)]
pub(crate) enum NoDisplay {}

#[cfg(not(windows))]
impl super::DisplayApi for NoDisplay {
    fn show(&self, _text: &str, _title: &str) -> i32 {
        match *self {}
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

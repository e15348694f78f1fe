// ── File transfer ─────────────────────────────────────────────────────────────
//
// Write and read one fixed-size buffer through whatever file capability the
// provider hands out.  Each call loads its own capability, opens its own
// handle and releases both before returning:
//
//   • the handle is closed by the explicit `close` after `transfer`, which is
//     the only way out once `open_or_create` succeeded;
//   • the module is released when the loaded capability drops, on success or
//     on any `?` return.

pub mod buffer;

use std::{io, path::Path};

use log::info;

pub(crate) use buffer::{ByteBuffer, DEFAULT_CAPACITY};

use crate::{
    error::{FileIoError, Result},
    lifecycle::{Lifecycle, Phase},
    platform::{CapabilityProvider, Direction, FileSystemApi, OpenMode},
};

/// Moves a payload to and from a file through a `CapabilityProvider`.
pub(crate) struct FileTransfer<'p, P> {
    provider: &'p P,
    capacity: usize,
    #[cfg(test)]
    last: Option<Lifecycle>,
}

impl<'p, P: CapabilityProvider> FileTransfer<'p, P> {
    pub(crate) fn new(provider: &'p P, capacity: usize) -> Self {
        Self {
            provider,
            capacity,
            #[cfg(test)]
            last: None,
        }
    }

    /// Lifecycle of the most recent `write` or `read`.
    #[cfg(test)]
    pub(crate) fn last_lifecycle(&self) -> Option<&Lifecycle> {
        self.last.as_ref()
    }

    /// Create (or truncate) `path` and write `payload` to it.
    ///
    /// Returns the number of bytes written.  A write that moves fewer bytes
    /// than the payload holds is reported as `TransferFailed`.
    pub(crate) fn write(&mut self, path: &Path, payload: &[u8]) -> Result<usize> {
        let mut life = Lifecycle::begin("write");
        let outcome = self.write_with(&mut life, path, payload);
        life.settle(&outcome);
        #[cfg(test)]
        {
            self.last = Some(life);
        }

        let written = outcome?;
        info!("File written successfully ({written} bytes).");
        Ok(written)
    }

    /// Open the existing file at `path` and read up to `capacity - 1` bytes.
    pub(crate) fn read(&mut self, path: &Path) -> Result<ByteBuffer> {
        let mut life = Lifecycle::begin("read");
        let outcome = self.read_with(&mut life, path);
        life.settle(&outcome);
        #[cfg(test)]
        {
            self.last = Some(life);
        }

        let buffer = outcome?;
        info!(
            "Read {} bytes from {} ({}-byte buffer).",
            buffer.len(),
            path.display(),
            buffer.capacity()
        );
        Ok(buffer)
    }

    fn write_with(&self, life: &mut Lifecycle, path: &Path, payload: &[u8]) -> Result<usize> {
        life.advance(Phase::Loading);
        let mut buffer = ByteBuffer::from_payload(payload, self.capacity)?;
        let files = self.provider.load_files()?;

        life.advance(Phase::Ready);
        let mut handle = files.open_or_create(path, OpenMode::CreateAlways)?;

        life.advance(Phase::Operating);
        let outcome = files.transfer(&mut handle, &mut buffer, Direction::Write);

        life.advance(Phase::Closing);
        files.close(handle);

        let written = outcome?;
        if written != buffer.len() {
            return Err(FileIoError::TransferFailed {
                direction: Direction::Write,
                source: io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("wrote {written} of {} bytes", buffer.len()),
                ),
            });
        }
        Ok(written)
    }

    fn read_with(&self, life: &mut Lifecycle, path: &Path) -> Result<ByteBuffer> {
        life.advance(Phase::Loading);
        let files = self.provider.load_files()?;

        life.advance(Phase::Ready);
        let mut handle = files.open_or_create(path, OpenMode::ReadExisting)?;

        life.advance(Phase::Operating);
        let mut buffer = ByteBuffer::with_capacity(self.capacity);
        let outcome = files.transfer(&mut handle, &mut buffer, Direction::Read);

        life.advance(Phase::Closing);
        files.close(handle);

        outcome?;
        Ok(buffer)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

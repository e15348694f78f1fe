// ── Transfer buffer ───────────────────────────────────────────────────────────
//
// Fixed-capacity byte storage with an explicit valid length.  The length is
// authoritative; the trailing NUL written after a read exists only so the
// bytes can still be handed to APIs that expect a C string.

use crate::error::{FileIoError, Result};

/// Capacity used when the configuration does not override it.
pub(crate) const DEFAULT_CAPACITY: usize = 1_024;

/// A fixed-capacity byte buffer with an explicit valid length.
#[derive(Debug, Clone)]
pub(crate) struct ByteBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl ByteBuffer {
    /// An empty, zero-filled buffer ready to receive a read.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// A buffer holding `payload`, ready to be written.
    ///
    /// Fails with `CapacityExceeded` if the payload is larger than `capacity`.
    pub(crate) fn from_payload(payload: &[u8], capacity: usize) -> Result<Self> {
        if payload.len() > capacity {
            return Err(FileIoError::CapacityExceeded {
                len: payload.len(),
                capacity,
            });
        }
        let mut buf = Self::with_capacity(capacity);
        buf.bytes[..payload.len()].copy_from_slice(payload);
        buf.len = payload.len();
        Ok(buf)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid bytes.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The region a read may fill: everything except the last byte, which is
    /// reserved for the terminator.
    pub(crate) fn read_window(&mut self) -> &mut [u8] {
        let limit = self.read_limit();
        &mut self.bytes[..limit]
    }

    /// Maximum number of bytes a single read may deliver.
    pub(crate) fn read_limit(&self) -> usize {
        self.bytes.len().saturating_sub(1)
    }

    /// Record that `n` bytes were read into `read_window()` and terminate them.
    ///
    /// `n` is clamped to the read window; a provider reporting more than it was
    /// offered cannot push the length past the reserved byte.
    pub(crate) fn set_len(&mut self, n: usize) {
        let n = n.min(self.read_limit());
        self.len = n;
        if let Some(terminator) = self.bytes.get_mut(n) {
            *terminator = 0;
        }
    }

    /// Decode the valid bytes as text.
    ///
    /// Stops at the first NUL, so a file written with a trailing terminator
    /// decodes to the same text as one without.
    pub(crate) fn text(&self) -> Result<&str> {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(std::str::from_utf8(&bytes[..end])?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Bounded read views over a shared byte source.
//!
//! - [`ByteWindow`] - `(source, start, len)` with a private cursor

use std::fmt;
use std::io::{self, Read};
use std::ops::Range;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::error::{ContainerError, Result};
use crate::source::ByteSource;

/// A read-only view of `len` bytes starting at `start` in a shared source.
///
/// Each window owns its own cursor. All reads are positioned reads at
/// `start + cursor`, so sibling windows over the same source never disturb
/// one another and may be consumed in any order. The cursor only moves
/// forward; a fresh cursor means a fresh window ([`ByteWindow::reopen`]).
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use std::sync::Arc;
/// use chunkweave::ByteWindow;
///
/// let source = Arc::new(b"Example of a section window".to_vec());
/// let mut window = ByteWindow::new(source, 11, 9)?;
///
/// let mut out = String::new();
/// window.read_to_string(&mut out)?;
/// assert_eq!(out, "a section");
/// # Ok::<(), chunkweave::ContainerError>(())
/// ```
pub struct ByteWindow<S: ?Sized> {
    source: Arc<S>,
    start: u64,
    len: u64,
    pos: u64,
}

impl<S: ByteSource + ?Sized> ByteWindow<S> {
    /// Creates a window over `source[start..start + len]`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if the range does not lie
    /// entirely inside the source. Nothing is clamped.
    pub fn new(source: Arc<S>, start: u64, len: u64) -> Result<Self> {
        let source_len = source.len();
        match start.checked_add(len) {
            Some(end) if end <= source_len => Ok(Self {
                source,
                start,
                len,
                pos: 0,
            }),
            _ => Err(ContainerError::OutOfRange {
                start,
                len,
                source_len,
            }),
        }
    }

    /// Creates a window whose range the caller already checked.
    pub(crate) fn from_validated(source: Arc<S>, start: u64, len: u64) -> Self {
        debug_assert!(start + len <= source.len());
        Self {
            source,
            start,
            len,
            pos: 0,
        }
    }

    /// Returns a window over the same range with its cursor at the start.
    pub fn reopen(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            start: self.start,
            len: self.len,
            pos: 0,
        }
    }

    /// Returns a window over `offset..offset + len` relative to this one.
    pub fn subwindow(&self, offset: u64, len: u64) -> Result<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(Self {
                source: Arc::clone(&self.source),
                start: self.start + offset,
                len,
                pos: 0,
            }),
            _ => Err(ContainerError::OutOfRange {
                start: offset,
                len,
                source_len: self.len,
            }),
        }
    }

    /// Reads exactly `n` bytes from the cursor.
    ///
    /// On [`ContainerError::EndOfWindow`] the cursor does not move.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        let remaining = self.remaining();
        if n as u64 > remaining {
            return Err(ContainerError::EndOfWindow {
                requested: n as u64,
                remaining,
            });
        }

        let mut buf = BytesMut::zeroed(n);
        self.source.read_exact_at(self.start + self.pos, &mut buf)?;
        self.pos += n as u64;
        Ok(buf.freeze())
    }

    /// Reads the whole window into memory, regardless of the cursor.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let len = usize::try_from(self.len).map_err(|_| ContainerError::OutOfRange {
            start: self.start,
            len: self.len,
            source_len: self.source.len(),
        })?;
        let mut buf = BytesMut::zeroed(len);
        self.source.read_exact_at(self.start, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Returns the shared source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ?Sized> ByteWindow<S> {
    /// Returns the absolute offset of the first byte.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the absolute offset one past the last byte.
    pub fn end(&self) -> u64 {
        self.start + self.len
    }

    /// Returns the window as an absolute range.
    pub fn range(&self) -> Range<u64> {
        self.start..self.end()
    }

    /// Returns the window length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the window covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the cursor, relative to the window start.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Returns the number of bytes left before the window end.
    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }
}

impl<S: ByteSource + ?Sized> Read for ByteWindow<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = buf.len().min(usize::try_from(self.remaining()).unwrap_or(usize::MAX));
        if want == 0 {
            return Ok(0);
        }

        let n = self.source.read_at(self.start + self.pos, &mut buf[..want])?;
        if n == 0 {
            // The window was validated against the source length, so the
            // source shrank underneath us.
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "source ended inside window",
            ));
        }
        self.pos += n as u64;
        Ok(n)
    }
}

impl<S: ?Sized> fmt::Debug for ByteWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteWindow")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("pos", &self.pos)
            .finish()
    }
}

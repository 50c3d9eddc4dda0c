//! Positioned-read byte sources.
//!
//! - [`ByteSource`] - stateless, offset-addressed read access
//! - [`FileSource`] - a file with its length captured at open time
//!
//! A source never carries a seek position. Every read names its own offset,
//! which is what lets any number of windows over one source be consumed in any
//! order without coordinating.

mod file;

pub use file::FileSource;

use std::cmp::min;
use std::io;
use std::sync::Arc;

use bytes::Bytes;

/// Offset-addressed, read-only access to a byte container.
///
/// Unlike `Read + Seek`, each call specifies its own offset, so a shared
/// `&self` is all a reader needs.
pub trait ByteSource: Send + Sync {
    /// Reads bytes at `offset` into `buf`.
    ///
    /// Returns the number of bytes read. A short read means the end of the
    /// source was reached; `Ok(0)` at or past the end.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads exactly `buf.len()` bytes at `offset`.
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] if the source ends before the
    /// buffer is filled.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let mut total = 0;

        while total < buf.len() {
            match self.read_at(offset + total as u64, &mut buf[total..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "unexpected end of source",
                    ));
                }
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Returns the total length of the source in bytes.
    fn len(&self) -> u64;

    /// Returns `true` if the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_from_slice(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    if start >= data.len() {
        return 0;
    }

    let n = min(buf.len(), data.len() - start);
    buf[..n].copy_from_slice(&data[start..start + n]);
    n
}

impl ByteSource for [u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_from_slice(self, offset, buf))
    }

    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }
}

impl ByteSource for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_from_slice(self, offset, buf))
    }

    fn len(&self) -> u64 {
        Vec::len(self) as u64
    }
}

impl ByteSource for Bytes {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_from_slice(self, offset, buf))
    }

    fn len(&self) -> u64 {
        Bytes::len(self) as u64
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn len(&self) -> u64 {
        (**self).len()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn len(&self) -> u64 {
        (**self).len()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Arc<S> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn len(&self) -> u64 {
        (**self).len()
    }
}

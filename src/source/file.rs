//! File-backed byte source.

use std::fs::File;
use std::io;
use std::path::Path;

use super::ByteSource;

/// A file read through positioned reads.
///
/// The length is captured once when the source is created; growth of the file
/// afterwards is not observed.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    /// Opens the file at `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_file(File::open(path)?)
    }

    /// Wraps an already opened file.
    pub fn from_file(file: File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }

    /// Returns the wrapped file.
    pub fn into_inner(self) -> File {
        self.file
    }
}

impl ByteSource for FileSource {
    #[cfg(unix)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;

        self.file.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;

        self.file.seek_read(buf, offset)
    }

    fn len(&self) -> u64 {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_positioned_reads() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();
        tmp.flush().unwrap();

        let source = FileSource::open(tmp.path()).unwrap();
        assert_eq!(source.len(), 10);

        let mut buf = [0u8; 3];
        source.read_exact_at(7, &mut buf).unwrap();
        assert_eq!(&buf, b"789");

        // Earlier offset after a later one: no shared cursor involved.
        source.read_exact_at(2, &mut buf).unwrap();
        assert_eq!(&buf, b"234");
    }
}

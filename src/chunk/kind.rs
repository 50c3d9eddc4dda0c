//! Chunk type tags.

use std::fmt;

use crate::error::ContainerError;

/// A 4-byte chunk type tag such as `IHDR` or `tEXt`.
///
/// Any four bytes are accepted when indexing. The letter-case property bits
/// are only meaningful for ASCII-letter tags, which is what PNG mandates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    /// The size of a tag in bytes.
    pub const SIZE: usize = 4;

    /// Image header, always the first chunk of a PNG.
    pub const IHDR: Self = Self(*b"IHDR");

    /// Image data.
    pub const IDAT: Self = Self(*b"IDAT");

    /// Image trailer, always the last chunk of a PNG.
    pub const IEND: Self = Self(*b"IEND");

    /// Human-readable text.
    pub const TEXT: Self = Self(*b"tEXt");

    /// Creates a tag from raw bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Creates a tag from a slice.
    ///
    /// Returns `None` if the slice is not exactly 4 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 4]>::try_from(slice).ok().map(Self)
    }

    /// Returns the tag bytes.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns true if all four bytes are ASCII letters.
    pub fn is_alphabetic(&self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic)
    }

    /// Critical chunks have an uppercase first letter.
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    /// Ancillary chunks have a lowercase first letter.
    pub fn is_ancillary(&self) -> bool {
        !self.is_critical()
    }

    /// Safe-to-copy chunks have a lowercase last letter.
    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&str> for ChunkType {
    type Error = ContainerError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_slice(s.as_bytes()).ok_or(ContainerError::InvalidConfig {
            message: "chunk type must be exactly 4 bytes",
        })
    }
}

impl AsRef<[u8]> for ChunkType {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

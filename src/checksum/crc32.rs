//! CRC-32 checksum engine.

use std::io;

/// An incremental CRC-32 hasher.
///
/// Standard IEEE 802.3 CRC: reflected polynomial `0xEDB88320`, initial value
/// and final XOR `0xFFFFFFFF`. Discontiguous fragments (a type tag, then a
/// payload) can be fed one after another without concatenating them first.
///
/// # Example
///
/// ```
/// use chunkweave::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"tEXt");
/// crc.update(b"hello");
/// assert_eq!(crc.finalize(), Crc32::checksum(b"tEXthello"));
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    state: crc32fast::Hasher,
}

impl Crc32 {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: crc32fast::Hasher::new(),
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Returns the checksum of everything fed so far.
    ///
    /// The hasher is left untouched, so more data may follow.
    pub fn finalize(&self) -> u32 {
        self.state.clone().finalize()
    }

    /// Resets the hasher to its initial state.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Convenience method to checksum data in one shot.
    pub fn checksum(data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for Crc32 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Crc32::checksum(b""), 0);
        assert_eq!(Crc32::new().finalize(), 0);
    }

    #[test]
    fn test_png_iend() {
        // Every PNG ends with this exact IEND record.
        assert_eq!(Crc32::checksum(b"IEND"), 0xAE42_6082);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut crc = Crc32::new();
        crc.update(b"1234");
        crc.update(b"");
        crc.update(b"56789");
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn test_finalize_does_not_consume() {
        let mut crc = Crc32::new();
        crc.update(b"1234");
        let _ = crc.finalize();
        crc.update(b"56789");
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn test_reset() {
        let mut crc = Crc32::new();
        crc.update(b"some data");
        crc.reset();
        crc.update(b"123456789");
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn test_io_copy_into_hasher() {
        let mut crc = Crc32::new();
        let mut reader: &[u8] = b"123456789";
        std::io::copy(&mut reader, &mut crc).unwrap();
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }
}

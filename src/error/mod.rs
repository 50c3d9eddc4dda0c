//! Error types for chunkweave.

use thiserror::Error;

/// Errors that can occur while indexing, windowing, building or writing a
/// chunk container.
///
/// Every variant is fatal for the operation that produced it. Running out of
/// chunks at the end of a stream is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// An I/O error occurred on the source or the sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not start with the expected signature.
    #[error("invalid signature: expected {expected:02x?}, got {actual:02x?}")]
    InvalidSignature {
        /// The configured signature.
        expected: Vec<u8>,
        /// The bytes actually found at offset 0 (shorter if the source is).
        actual: Vec<u8>,
    },

    /// A chunk declares more payload than the source still holds.
    #[error(
        "truncated chunk at offset {offset}: declares {declared} payload bytes, \
         only {available} bytes follow the length field"
    )]
    TruncatedChunk {
        /// Offset of the chunk's length field.
        offset: u64,
        /// Declared payload length.
        declared: u32,
        /// Bytes left in the source after the length field.
        available: u64,
    },

    /// A window or splice position lies outside its source.
    #[error("range {start}+{len} is out of bounds (source holds {source_len})")]
    OutOfRange {
        /// Requested start.
        start: u64,
        /// Requested length.
        len: u64,
        /// Size of the source the request was checked against.
        source_len: u64,
    },

    /// An exact read asked for more than the window has left.
    #[error("end of window: requested {requested} bytes, {remaining} remaining")]
    EndOfWindow {
        /// Bytes requested.
        requested: u64,
        /// Bytes left before the window end.
        remaining: u64,
    },

    /// The sink stopped accepting bytes before the write completed.
    #[error("incomplete write: expected {expected} bytes, sink accepted {written}")]
    IncompleteWrite {
        /// Bytes the write should have produced.
        expected: u64,
        /// Bytes the sink accepted.
        written: u64,
    },

    /// A payload cannot be described by a 32-bit length field.
    #[error("payload of {len} bytes does not fit a 32-bit length field")]
    PayloadTooLarge {
        /// Payload length.
        len: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: ContainerError = io_err.into();
        assert!(matches!(err, ContainerError::Io(_)));
    }

    #[test]
    fn test_display_truncated() {
        let err = ContainerError::TruncatedChunk {
            offset: 8,
            declared: 100,
            available: 12,
        };
        let s = err.to_string();
        assert!(s.contains("offset 8"));
        assert!(s.contains("100"));
        assert!(s.contains("12"));
    }

    #[test]
    fn test_display_signature_is_hex() {
        let err = ContainerError::InvalidSignature {
            expected: vec![0x89, 0x50],
            actual: vec![0x00],
        };
        assert!(err.to_string().contains("89"));
    }

    #[test]
    fn test_display_incomplete_write() {
        let err = ContainerError::IncompleteWrite {
            expected: 20,
            written: 7,
        };
        assert!(err.to_string().contains("accepted 7"));
    }
}

//! Checksum implementations for chunk integrity fields.
//!
//! - [`Crc32`] - incremental CRC-32 (IEEE), the checksum every chunk carries

mod crc32;

pub use crc32::Crc32;

//! Configuration for container handling.
//!
//! - [`ContainerConfig`] - Signature, textual chunk type and checksum scope
//! - [`ChecksumScope`] - Which bytes a synthesized chunk's checksum covers

use bytes::Bytes;

use crate::chunk::ChunkType;
use crate::error::ContainerError;

/// The PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Configuration describing one container profile.
///
/// Defaults to PNG: the 8-byte PNG signature, `tEXt` as the textual chunk
/// type, and checksums over type and payload.
///
/// # Example
///
/// ```
/// use chunkweave::{ChecksumScope, ContainerConfig};
///
/// let config = ContainerConfig::new(&b"MYFMT\0"[..])?
///     .with_checksum_scope(ChecksumScope::TypeOnly);
/// assert_eq!(&config.signature()[..], b"MYFMT\0");
/// # Ok::<(), chunkweave::ContainerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerConfig {
    signature: Bytes,
    text_type: ChunkType,
    checksum_scope: ChecksumScope,
}

impl ContainerConfig {
    /// Creates a configuration for containers starting with `signature`.
    ///
    /// Returns error if the signature is empty.
    pub fn new(signature: impl Into<Bytes>) -> Result<Self, ContainerError> {
        let config = Self {
            signature: signature.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// The PNG profile.
    pub fn png() -> Self {
        Self::default()
    }

    /// Sets the signature.
    pub fn with_signature(mut self, signature: impl Into<Bytes>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Sets the chunk type treated as human-readable text.
    pub fn with_text_type(mut self, chunk_type: ChunkType) -> Self {
        self.text_type = chunk_type;
        self
    }

    /// Sets the checksum scope used when building chunks.
    pub fn with_checksum_scope(mut self, scope: ChecksumScope) -> Self {
        self.checksum_scope = scope;
        self
    }

    /// Returns the signature.
    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// Returns the textual chunk type.
    pub fn text_type(&self) -> ChunkType {
        self.text_type
    }

    /// Returns the checksum scope.
    pub fn checksum_scope(&self) -> ChecksumScope {
        self.checksum_scope
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.signature.is_empty() {
            return Err(ContainerError::InvalidConfig {
                message: "signature must be non-empty",
            });
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            signature: Bytes::from_static(&PNG_SIGNATURE),
            text_type: ChunkType::TEXT,
            checksum_scope: ChecksumScope::default(),
        }
    }
}

/// Which bytes the checksum of a synthesized chunk covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumScope {
    /// Type tag followed by payload. This is what conforming readers verify.
    #[default]
    TypeAndPayload,

    /// Type tag only. Reproduces writers that left the payload out of the
    /// checksum; readers that verify checksums will reject such chunks
    /// unless the payload is empty.
    TypeOnly,
}

impl ChecksumScope {
    /// Returns true if the payload is part of the checksum input.
    pub const fn covers_payload(self) -> bool {
        matches!(self, ChecksumScope::TypeAndPayload)
    }
}

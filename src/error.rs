//! Error types for probe operations.

use std::io;

use crate::limits::LimitExceeded;

/// Unified error type for probe operations.
///
/// Every variant aborts the probe; no partial result is ever produced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The stream is not a structurally valid GIF.
    #[error("malformed GIF: {0}")]
    Malformed(#[from] Malformed),
    /// A configured resource budget was breached.
    #[error("limit exceeded: {0}")]
    ResourceExceeded(#[from] LimitExceeded),
    /// The trailer was reached without a single image block.
    #[error("GIF contains no image blocks")]
    Empty,
    /// The byte source failed for a reason other than running out of data.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// Structural defects that make a stream unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Malformed {
    /// The 6-byte header is neither `GIF87a` nor `GIF89a`.
    #[error("invalid signature {0:02x?}")]
    Signature([u8; 6]),
    /// A block started with a byte that is not an introducer.
    #[error("unexpected block introducer 0x{byte:02x} at offset {offset}")]
    Introducer { byte: u8, offset: u64 },
    /// An extension label this probe does not accept.
    #[error("unknown extension label 0x{label:02x} at offset {offset}")]
    ExtensionLabel { label: u8, offset: u64 },
    /// The stream ended before a complete structure could be read.
    #[error("stream truncated at offset {offset}")]
    Truncated { offset: u64 },
    /// An image descriptor that reaches past the logical screen.
    #[error("frame at offset {offset} extends past the canvas")]
    FrameBounds { offset: u64 },
    /// A graphic control extension with a body other than 4 bytes.
    #[error("graphic control extension body is {0} bytes, expected 4")]
    GraphicControl(usize),
    /// Reserved disposal method value.
    #[error("reserved disposal method {0}")]
    Disposal(u8),
    /// LZW minimum code size outside 1..=11.
    #[error("invalid LZW minimum code size {0}")]
    MinCodeSize(u8),
    /// The compressed pixel data could not be decoded.
    #[error("corrupt LZW stream: {0}")]
    CorruptStream(&'static str),
}

impl ProbeError {
    /// Whether this error describes a structurally invalid stream.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProbeError::Malformed(_))
    }

    /// Whether this error was triggered by a configured budget.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, ProbeError::ResourceExceeded(_))
    }

    /// Map a read failure at `offset`; running out of bytes is a truncation.
    pub(crate) fn from_io(err: io::Error, offset: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Malformed::Truncated { offset }.into()
        } else {
            ProbeError::Io(err)
        }
    }
}

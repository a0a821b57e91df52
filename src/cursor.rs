//! Forward-only byte reader with GIF sub-block framing.

use std::io::Read;

use crate::error::ProbeError;

/// Largest payload a single sub-block can carry.
const MAX_SUB_BLOCK: usize = 255;

/// Sequential reader over the input that tracks how many bytes it consumed.
pub(crate) struct Cursor<R> {
    inner: R,
    offset: u64,
}

/// Result of consuming a sub-block sequence.
#[derive(Debug, Default)]
pub(crate) struct SubBlockData {
    /// Leading payload bytes, capped at what the caller asked to keep.
    pub(crate) payload: Vec<u8>,
    /// Total payload length, terminator and length prefixes excluded.
    pub(crate) len: u64,
}

impl<R: Read> Cursor<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed so far.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Fill `buf` completely or fail with a truncation at the current offset.
    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ProbeError> {
        self.inner
            .read_exact(buf)
            .map_err(|e| ProbeError::from_io(e, self.offset))?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ProbeError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, ProbeError> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Consume a sub-block sequence through its zero-length terminator.
    ///
    /// At most `keep` payload bytes are collected; everything past that is
    /// read into a stack buffer and dropped. `keep == 0` is skip mode and
    /// never allocates.
    pub(crate) fn read_sub_blocks(&mut self, keep: usize) -> Result<SubBlockData, ProbeError> {
        let mut data = SubBlockData::default();
        let mut block = [0u8; MAX_SUB_BLOCK];

        loop {
            let len = self.read_u8()? as usize;
            if len == 0 {
                break;
            }

            let chunk = &mut block[..len];
            self.read_exact(chunk)?;
            log::trace!("sub-block of {len} bytes at offset {}", self.offset);

            let room = keep.saturating_sub(data.payload.len()).min(len);
            data.payload.extend_from_slice(&chunk[..room]);
            data.len += len as u64;
        }

        Ok(data)
    }

    /// Skip a sub-block sequence, returning the number of payload bytes discarded.
    pub(crate) fn skip_sub_blocks(&mut self) -> Result<u64, ProbeError> {
        self.read_sub_blocks(0).map(|data| data.len)
    }

    /// Stream the payload of a sub-block sequence one byte at a time.
    pub(crate) fn sub_blocks(&mut self) -> SubBlocks<'_, R> {
        SubBlocks {
            cursor: self,
            block: [0; MAX_SUB_BLOCK],
            pos: 0,
            len: 0,
            finished: false,
        }
    }
}

/// Byte source over a sub-block sequence that hides the length prefixes.
///
/// Assumes the cursor is positioned at the first length byte.
pub(crate) struct SubBlocks<'a, R> {
    cursor: &'a mut Cursor<R>,
    block: [u8; MAX_SUB_BLOCK],
    pos: usize,
    len: usize,
    finished: bool,
}

impl<R: Read> SubBlocks<'_, R> {
    /// Next payload byte, or `None` once the terminator has been read.
    pub(crate) fn next_byte(&mut self) -> Result<Option<u8>, ProbeError> {
        if self.pos == self.len {
            if self.finished {
                return Ok(None);
            }

            let len = self.cursor.read_u8()? as usize;
            if len == 0 {
                self.finished = true;
                return Ok(None);
            }

            self.cursor.read_exact(&mut self.block[..len])?;
            self.pos = 0;
            self.len = len;
        }

        let byte = self.block[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Discard the rest of the sequence through its terminator.
    pub(crate) fn drain(self) -> Result<u64, ProbeError> {
        let buffered = (self.len - self.pos) as u64;
        if self.finished {
            return Ok(buffered);
        }
        Ok(buffered + self.cursor.skip_sub_blocks()?)
    }
}

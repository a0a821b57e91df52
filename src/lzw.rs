//! Variable-width LZW decoding of GIF image data.
//!
//! Codes are packed least-significant-bit first across sub-block boundaries.
//! The decoder pulls bytes from a [`SubBlocks`] source, so the compressed
//! payload is never collected into one buffer, and it can return as soon as
//! the caller has seen what it needs.

use std::io::Read;

use crate::cursor::SubBlocks;
use crate::error::{Malformed, ProbeError};

const MAX_CODES: usize = 4096;
const MAX_CODE_SIZE: u8 = 12;

/// How a decode run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// The end code was reached with the whole region decoded.
    Complete,
    /// The caller's predicate fired; the rest of the stream was left unread.
    Stopped,
}

pub(crate) struct LzwDecoder {
    min_code_size: u8,
    clear_code: u16,
    end_code: u16,

    code_size: u8,
    next_code: u16,
    prev_code: Option<u16>,
    /// First index of the most recently emitted string.
    first: u8,

    bit_buffer: u32,
    bits_in_buffer: u8,

    prefix: [u16; MAX_CODES],
    suffix: [u8; MAX_CODES],
    stack: Vec<u8>,
}

/// Validate the minimum code size byte that opens every image data stream.
pub(crate) fn check_min_code_size(min_code_size: u8) -> Result<u8, Malformed> {
    if (1..=11).contains(&min_code_size) {
        Ok(min_code_size)
    } else {
        Err(Malformed::MinCodeSize(min_code_size))
    }
}

impl LzwDecoder {
    pub(crate) fn new(min_code_size: u8) -> Result<Self, Malformed> {
        let min_code_size = check_min_code_size(min_code_size)?;

        let clear_code = 1 << min_code_size;
        let mut decoder = Self {
            min_code_size,
            clear_code,
            end_code: clear_code + 1,
            code_size: min_code_size + 1,
            next_code: clear_code + 2,
            prev_code: None,
            first: 0,
            bit_buffer: 0,
            bits_in_buffer: 0,
            prefix: [0; MAX_CODES],
            suffix: [0; MAX_CODES],
            stack: Vec::with_capacity(MAX_CODES + 1),
        };

        for code in 0..clear_code {
            decoder.suffix[code as usize] = code as u8;
        }
        decoder.reset();
        Ok(decoder)
    }

    fn reset(&mut self) {
        self.code_size = self.min_code_size + 1;
        self.next_code = self.end_code + 1;
        self.prev_code = None;
    }

    fn read_code<R: Read>(&mut self, src: &mut SubBlocks<'_, R>) -> Result<u16, ProbeError> {
        while self.bits_in_buffer < self.code_size {
            let byte = src
                .next_byte()?
                .ok_or(Malformed::CorruptStream("image data ended before the end code"))?;
            self.bit_buffer |= u32::from(byte) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
        }

        let code = (self.bit_buffer & ((1 << self.code_size) - 1)) as u16;
        self.bit_buffer >>= self.code_size;
        self.bits_in_buffer -= self.code_size;
        Ok(code)
    }

    /// Decode up to the end code, appending indices to `out`.
    ///
    /// Indices past `limit` are dropped. After each decoded string `stop` is
    /// called with the indices it contributed; returning `true` ends decoding
    /// immediately with [`Decoded::Stopped`].
    pub(crate) fn decode<R: Read>(
        &mut self,
        src: &mut SubBlocks<'_, R>,
        out: &mut Vec<u8>,
        limit: usize,
        mut stop: impl FnMut(&[u8]) -> bool,
    ) -> Result<Decoded, ProbeError> {
        loop {
            let code = self.read_code(src)?;

            if code == self.clear_code {
                self.reset();
                continue;
            }
            if code == self.end_code {
                if out.len() < limit {
                    return Err(Malformed::CorruptStream("image data shorter than the frame").into());
                }
                return Ok(Decoded::Complete);
            }

            let mut current = code;
            match self.prev_code {
                Some(prev) if code == self.next_code => {
                    // KwKwK: the previous string followed by its own first index.
                    self.stack.push(self.first);
                    current = prev;
                }
                _ if code >= self.next_code => {
                    return Err(Malformed::CorruptStream("code not yet in the table").into());
                }
                _ => {}
            }

            while current >= self.clear_code {
                self.stack.push(self.suffix[current as usize]);
                current = self.prefix[current as usize];
            }
            if current > u16::from(u8::MAX) {
                return Err(Malformed::CorruptStream("index wider than 8 bits").into());
            }
            self.first = current as u8;
            self.stack.push(self.first);

            if let Some(prev) = self.prev_code {
                if usize::from(self.next_code) < MAX_CODES {
                    self.prefix[self.next_code as usize] = prev;
                    self.suffix[self.next_code as usize] = self.first;
                    self.next_code += 1;

                    if self.next_code == 1 << self.code_size && self.code_size < MAX_CODE_SIZE {
                        self.code_size += 1;
                    }
                }
            }
            self.prev_code = Some(code);

            let start = out.len();
            let room = limit.saturating_sub(start);
            out.extend(self.stack.drain(..).rev().take(room));
            if stop(&out[start..]) {
                return Ok(Decoded::Stopped);
            }
        }
    }
}

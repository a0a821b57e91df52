//! Hand-rolled GIF streams for unit tests.

/// Frame a payload as a sub-block sequence with its terminator.
pub(crate) fn sub_blocks(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + payload.len() / 255 + 2);
    for chunk in payload.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// LZW-encode `indices` using only literal codes.
///
/// Tracks the decoder's table growth so every code is written at the width
/// the decoder will read it with, and emits a clear code before the table
/// fills.
pub(crate) fn lzw_literal(min_code_size: u8, indices: &[u8]) -> Vec<u8> {
    let clear = 1u16 << min_code_size;
    let end = clear + 1;

    let mut out = Vec::new();
    let mut acc = 0u32;
    let mut bits = 0u8;
    let mut write = |code: u16, width: u8, out: &mut Vec<u8>| {
        acc |= u32::from(code) << bits;
        bits += width;
        while bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    };

    let mut width = min_code_size + 1;
    let mut next = end + 1;
    let mut fresh = true;
    write(clear, width, &mut out);

    for &index in indices {
        write(u16::from(index), width, &mut out);
        if fresh {
            fresh = false;
        } else if next < 4096 {
            next += 1;
            if next == 1 << width && width < 12 {
                width += 1;
            }
        }

        if next >= 4000 {
            write(clear, width, &mut out);
            width = min_code_size + 1;
            next = end + 1;
            fresh = true;
        }
    }

    write(end, width, &mut out);
    if bits > 0 {
        out.push(acc as u8);
    }
    out
}

fn size_field(entries: usize) -> u8 {
    assert!(entries.is_power_of_two() && (2..=256).contains(&entries));
    entries.trailing_zeros() as u8 - 1
}

fn palette(entries: usize) -> impl Iterator<Item = u8> {
    (0..entries).flat_map(|i| [i as u8, (i * 3) as u8, 255 - i as u8])
}

/// Builder for small GIF streams, one block at a time.
pub(crate) struct GifBuilder {
    bytes: Vec<u8>,
    table: usize,
}

impl GifBuilder {
    pub(crate) fn new(width: u16, height: u16, global_table: Option<usize>) -> Self {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend(width.to_le_bytes());
        bytes.extend(height.to_le_bytes());
        match global_table {
            Some(entries) => {
                bytes.extend([0x80 | 0x70 | size_field(entries), 0, 0]);
                bytes.extend(palette(entries));
            }
            None => bytes.extend([0, 0, 0]),
        }
        Self {
            bytes,
            table: global_table.unwrap_or(0),
        }
    }

    /// Graphic control extension with a disposal value, delay in hundredths,
    /// and optional transparent index.
    pub(crate) fn control(mut self, disposal: u8, delay: u16, transparent: Option<u8>) -> Self {
        let packed = (disposal << 2) | u8::from(transparent.is_some());
        self.bytes.extend([0x21, 0xF9, 4, packed]);
        self.bytes.extend(delay.to_le_bytes());
        self.bytes.extend([transparent.unwrap_or(0), 0]);
        self
    }

    pub(crate) fn comment(mut self, text: &[u8]) -> Self {
        self.bytes.extend([0x21, 0xFE]);
        self.bytes.extend(sub_blocks(text));
        self
    }

    pub(crate) fn netscape_loop(mut self) -> Self {
        self.bytes.extend([0x21, 0xFF, 11]);
        self.bytes.extend(b"NETSCAPE2.0");
        self.bytes.extend([3, 1, 0, 0, 0]);
        self
    }

    /// Image block at the canvas origin covering `width`×`height`.
    pub(crate) fn image(
        self,
        width: u16,
        height: u16,
        local_table: Option<usize>,
        indices: &[u8],
    ) -> Self {
        self.image_at((0, 0), (width, height), 0, local_table, indices)
    }

    /// Image block at `(left, top)` with extra descriptor flags such as interlacing.
    pub(crate) fn image_at(
        mut self,
        (left, top): (u16, u16),
        (width, height): (u16, u16),
        flags: u8,
        local_table: Option<usize>,
        indices: &[u8],
    ) -> Self {
        self.bytes.push(0x2C);
        self.bytes.extend(left.to_le_bytes());
        self.bytes.extend(top.to_le_bytes());
        self.bytes.extend(width.to_le_bytes());
        self.bytes.extend(height.to_le_bytes());
        match local_table {
            Some(entries) => {
                self.bytes.push(0x80 | flags | size_field(entries));
                self.bytes.extend(palette(entries));
            }
            None => self.bytes.push(flags),
        }

        let entries = local_table.unwrap_or(self.table).max(4);
        let min_code_size = entries.trailing_zeros() as u8;
        self.bytes.push(min_code_size);
        self.bytes.extend(sub_blocks(&lzw_literal(min_code_size, indices)));
        self
    }

    /// Append raw bytes verbatim.
    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.bytes.push(0x3B);
        self.bytes
    }

    /// The stream so far, without a trailer.
    pub(crate) fn unterminated(self) -> Vec<u8> {
        self.bytes
    }
}

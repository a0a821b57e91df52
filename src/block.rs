//! GIF block structures: descriptors, color tables, and graphic control.

use rgb::RGB8;

use crate::error::Malformed;

const TABLE_FLAG: u8 = 0b1000_0000;
const TABLE_SIZE_MASK: u8 = 0b0000_0111;

/// Number of entries encoded by a 3-bit table-size field.
fn table_size(packed: u8) -> usize {
    2 << (packed & TABLE_SIZE_MASK)
}

/// Logical screen descriptor: the 7 bytes following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenDescriptor {
    pub(crate) width: u16,
    pub(crate) height: u16,
    packed: u8,
}

impl ScreenDescriptor {
    pub(crate) fn from_bytes(bytes: [u8; 7]) -> Self {
        // bytes[5] is the background index and bytes[6] the aspect ratio; both unused.
        Self {
            width: u16::from_le_bytes([bytes[0], bytes[1]]),
            height: u16::from_le_bytes([bytes[2], bytes[3]]),
            packed: bytes[4],
        }
    }

    /// Entry count of the global color table, if one follows.
    pub(crate) fn global_table_size(&self) -> Option<usize> {
        (self.packed & TABLE_FLAG != 0).then(|| table_size(self.packed))
    }
}

/// Image descriptor: the 9 bytes following an `0x2C` introducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImageDescriptor {
    pub(crate) left: u16,
    pub(crate) top: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
    packed: u8,
}

impl ImageDescriptor {
    pub(crate) fn from_bytes(bytes: [u8; 9]) -> Self {
        Self {
            left: u16::from_le_bytes([bytes[0], bytes[1]]),
            top: u16::from_le_bytes([bytes[2], bytes[3]]),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
            packed: bytes[8],
        }
    }

    /// Entry count of the local color table, if one follows.
    pub(crate) fn local_table_size(&self) -> Option<usize> {
        (self.packed & TABLE_FLAG != 0).then(|| table_size(self.packed))
    }

    pub(crate) fn interlaced(&self) -> bool {
        self.packed & 0b0100_0000 != 0
    }

    /// Whether the frame lies entirely inside a `width`×`height` canvas.
    pub(crate) fn fits_within(&self, width: u16, height: u16) -> bool {
        u32::from(self.left) + u32::from(self.width) <= u32::from(width)
            && u32::from(self.top) + u32::from(self.height) <= u32::from(height)
    }

    pub(crate) fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// How the canvas is treated after a frame is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisposalMethod {
    /// No disposal specified; decoders leave the canvas alone.
    #[default]
    Unspecified,
    /// Leave the frame in place.
    DoNotDispose,
    /// Clear the frame's region to the background.
    RestoreToBackground,
    /// Restore the region to what it was before the frame.
    RestoreToPrevious,
}

impl DisposalMethod {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DisposalMethod::Unspecified),
            1 => Some(DisposalMethod::DoNotDispose),
            2 => Some(DisposalMethod::RestoreToBackground),
            3 => Some(DisposalMethod::RestoreToPrevious),
            _ => None,
        }
    }
}

/// Graphic control extension (label `0xF9`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GraphicControl {
    pub(crate) disposal: DisposalMethod,
    pub(crate) transparent: Option<u8>,
    /// Hundredths of a second.
    pub(crate) delay: u16,
}

impl GraphicControl {
    pub(crate) const BODY_LEN: usize = 4;

    /// Parse the concatenated extension body; `len` is its full length.
    pub(crate) fn from_body(body: &[u8], len: u64) -> Result<Self, Malformed> {
        let &[packed, delay_lo, delay_hi, index] = body else {
            return Err(Malformed::GraphicControl(len as usize));
        };
        if len != Self::BODY_LEN as u64 {
            return Err(Malformed::GraphicControl(len as usize));
        }

        let method = (packed >> 2) & 0b111;
        let disposal = DisposalMethod::from_u8(method).ok_or(Malformed::Disposal(method))?;

        Ok(Self {
            disposal,
            transparent: (packed & 0b1 != 0).then_some(index),
            delay: u16::from_le_bytes([delay_lo, delay_hi]),
        })
    }
}

/// A global or local palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColorTable {
    colors: Vec<RGB8>,
}

impl ColorTable {
    /// Bytes a table of `size` entries occupies, both on the wire and in memory.
    pub(crate) fn byte_len(size: usize) -> u64 {
        size as u64 * 3
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            colors: bytes
                .chunks_exact(3)
                .map(|c| RGB8::new(c[0], c[1], c[2]))
                .collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether `index` addresses an entry of this table.
    pub(crate) fn contains(&self, index: u8) -> bool {
        usize::from(index) < self.colors.len()
    }
}

/// Structural facts retained for every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameRecord {
    pub(crate) index: u64,
    pub(crate) disposal: DisposalMethod,
    pub(crate) delay_ms: u64,
}

impl FrameRecord {
    pub(crate) fn new(index: u64, control: Option<&GraphicControl>) -> Self {
        let (disposal, delay) = control.map_or((DisposalMethod::Unspecified, 0), |gce| {
            (gce.disposal, gce.delay)
        });
        Self {
            index,
            disposal,
            delay_ms: u64::from(delay) * 10,
        }
    }
}

//! Block-level state machine over a GIF stream.
//!
//! One forward pass: header, screen descriptor, optional global table, then a
//! loop over extensions and image blocks until the trailer or until the
//! transparency verdict is settled. Only the first frame's pixels are ever
//! decoded, and only when its graphic control declares a usable transparent
//! index.

use std::io::Read;

use crate::block::{ColorTable, FrameRecord, GraphicControl, ImageDescriptor, ScreenDescriptor};
use crate::cursor::Cursor;
use crate::error::{Malformed, ProbeError};
use crate::format::GifVersion;
use crate::limits::{Governor, LimitExceeded, Limits};
use crate::lzw::{self, Decoded, LzwDecoder};
use crate::probe::{ProbeAccumulator, ProbeResult};

const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;

const LABEL_PLAIN_TEXT: u8 = 0x01;
const LABEL_GRAPHIC_CONTROL: u8 = 0xF9;
const LABEL_COMMENT: u8 = 0xFE;
const LABEL_APPLICATION: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    ScreenDescriptor,
    GlobalColorTable(usize),
    BlockLoop,
    Done,
}

pub(crate) struct Parser<'a, R> {
    cursor: Cursor<R>,
    governor: Governor<'a>,
    acc: ProbeAccumulator,
    global_table: Option<ColorTable>,
    /// Graphic control waiting for the next image block.
    pending: Option<GraphicControl>,
    canvas: (u16, u16),
}

impl<'a, R: Read> Parser<'a, R> {
    pub(crate) fn new(reader: R, limits: &'a Limits) -> Self {
        Self {
            cursor: Cursor::new(reader),
            governor: Governor::new(limits),
            acc: ProbeAccumulator::default(),
            global_table: None,
            pending: None,
            canvas: (0, 0),
        }
    }

    pub(crate) fn run(mut self) -> Result<ProbeResult, ProbeError> {
        let mut state = State::Header;
        loop {
            state = match state {
                State::Header => self.header()?,
                State::ScreenDescriptor => self.screen_descriptor()?,
                State::GlobalColorTable(entries) => {
                    self.global_table = Some(self.color_table(entries)?);
                    State::BlockLoop
                }
                State::BlockLoop => self.next_block()?,
                State::Done => return self.acc.finish(),
            };
        }
    }

    fn header(&mut self) -> Result<State, ProbeError> {
        let header = self.cursor.read_array::<{ GifVersion::HEADER_LEN }>()?;
        let version = GifVersion::detect(&header).ok_or(Malformed::Signature(header))?;
        log::debug!("{version:?} stream");
        Ok(State::ScreenDescriptor)
    }

    fn screen_descriptor(&mut self) -> Result<State, ProbeError> {
        let screen = ScreenDescriptor::from_bytes(self.cursor.read_array()?);
        self.governor.check_canvas(screen.width, screen.height)?;
        self.acc.set_canvas(screen.width, screen.height);
        self.canvas = (screen.width, screen.height);
        log::debug!(
            "canvas {}x{}, global table: {:?}",
            screen.width,
            screen.height,
            screen.global_table_size()
        );

        Ok(match screen.global_table_size() {
            Some(entries) => State::GlobalColorTable(entries),
            None => State::BlockLoop,
        })
    }

    fn color_table(&mut self, entries: usize) -> Result<ColorTable, ProbeError> {
        let len = ColorTable::byte_len(entries);
        self.governor.reserve(len)?;

        let mut bytes = vec![0u8; len as usize];
        self.cursor.read_exact(&mut bytes)?;
        self.acc.observe_palette(entries);
        Ok(ColorTable::from_bytes(&bytes))
    }

    fn next_block(&mut self) -> Result<State, ProbeError> {
        let offset = self.cursor.offset();
        match self.cursor.read_u8()? {
            EXTENSION_INTRODUCER => self.extension(),
            IMAGE_SEPARATOR => self.image(),
            TRAILER => {
                log::debug!("trailer at offset {offset}");
                Ok(State::Done)
            }
            byte => Err(Malformed::Introducer { byte, offset }.into()),
        }
    }

    fn extension(&mut self) -> Result<State, ProbeError> {
        let offset = self.cursor.offset();
        match self.cursor.read_u8()? {
            LABEL_GRAPHIC_CONTROL => {
                let body = self.cursor.read_sub_blocks(GraphicControl::BODY_LEN)?;
                let control = GraphicControl::from_body(&body.payload, body.len)?;
                if self.pending.replace(control).is_some() {
                    log::debug!("graphic control at offset {offset} replaces an unused one");
                }
            }
            label @ (LABEL_COMMENT | LABEL_PLAIN_TEXT | LABEL_APPLICATION) => {
                let skipped = self.cursor.skip_sub_blocks()?;
                log::trace!("skipped extension 0x{label:02x} ({skipped} bytes)");
            }
            label => return Err(Malformed::ExtensionLabel { label, offset }.into()),
        }
        Ok(State::BlockLoop)
    }

    fn image(&mut self) -> Result<State, ProbeError> {
        let offset = self.cursor.offset();
        let descriptor = ImageDescriptor::from_bytes(self.cursor.read_array()?);
        let (width, height) = self.canvas;
        if !descriptor.fits_within(width, height) {
            return Err(Malformed::FrameBounds { offset }.into());
        }
        let local_table = descriptor
            .local_table_size()
            .map(|entries| self.color_table(entries))
            .transpose()?;
        let control = self.pending.take();
        let index = self.acc.frames();

        let table = local_table.as_ref().or(self.global_table.as_ref());
        let transparent = control
            .and_then(|gce| gce.transparent)
            .filter(|&t| table.is_some_and(|table| table.contains(t)));

        let decode = index == 0 && transparent.is_some();
        let found = self.image_data(decode, &descriptor, transparent.unwrap_or_default())?;

        if let Some(table) = local_table {
            self.governor.release(ColorTable::byte_len(table.len()));
        }

        let record = FrameRecord::new(index, control.as_ref());
        let duration = self.acc.record_frame(&record);
        log::debug!(
            "frame {index}: {}x{}{}, {:?}, {} ms",
            descriptor.width,
            descriptor.height,
            if descriptor.interlaced() { " interlaced" } else { "" },
            record.disposal,
            record.delay_ms
        );
        self.governor.check_duration(duration)?;

        if found {
            self.acc.mark_alpha();
        }
        self.acc.observe_disposal(&record, descriptor.pixel_count());

        if self.acc.alpha() {
            log::debug!("transparency settled at frame {index}, skipping the rest");
            return Ok(State::Done);
        }
        Ok(State::BlockLoop)
    }

    /// Consume one image data stream.
    ///
    /// With `decode` set the indices are decoded until `transparent` shows
    /// up, and the return value says whether it did. Otherwise the data is
    /// skipped without decoding.
    fn image_data(
        &mut self,
        decode: bool,
        descriptor: &ImageDescriptor,
        transparent: u8,
    ) -> Result<bool, ProbeError> {
        let min_code_size = lzw::check_min_code_size(self.cursor.read_u8()?)?;

        if !decode {
            self.cursor.skip_sub_blocks()?;
            return Ok(false);
        }

        let pixels = descriptor.pixel_count();
        self.governor.reserve(pixels)?;
        let limit =
            usize::try_from(pixels).map_err(|_| LimitExceeded::Allocation { bytes: pixels })?;
        let mut indices = Vec::new();
        indices
            .try_reserve_exact(limit)
            .map_err(|_| LimitExceeded::Allocation { bytes: pixels })?;

        log::trace!("{} bytes held for tables and indices", self.governor.in_use());

        let mut decoder = LzwDecoder::new(min_code_size)?;
        let mut blocks = self.cursor.sub_blocks();
        let outcome = decoder.decode(&mut blocks, &mut indices, limit, |run| {
            run.contains(&transparent)
        })?;

        let found = outcome == Decoded::Stopped;
        if !found {
            blocks.drain()?;
        }
        log::debug!(
            "decoded {} of {pixels} indices, transparent index {transparent} {}",
            indices.len(),
            if found { "used" } else { "unused" }
        );

        drop(indices);
        self.governor.release(pixels);
        Ok(found)
    }
}

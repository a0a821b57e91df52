//! Probe results and the accumulator that builds them.

use crate::block::{DisposalMethod, FrameRecord};
use crate::error::ProbeError;

/// Facts gathered from one pass over a GIF.
///
/// Frames after an early-success stop are not visited, so `duration`,
/// `frames`, and `max_colors` cover only the frames read up to that point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ProbeResult {
    /// Whether the image renders at least one transparent pixel.
    pub alpha: bool,
    /// Largest color table (global or local) seen.
    pub max_colors: u16,
    /// Sum of visited frame delays in milliseconds.
    pub duration: u64,
    /// Number of visited image blocks.
    pub frames: u64,
    /// Canvas width in pixels.
    pub width: u16,
    /// Canvas height in pixels.
    pub height: u16,
}

/// Running totals for a probe in progress.
#[derive(Debug, Default)]
pub(crate) struct ProbeAccumulator {
    alpha: bool,
    max_colors: u16,
    duration: u64,
    frames: u64,
    width: u16,
    height: u16,
}

impl ProbeAccumulator {
    pub(crate) fn set_canvas(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn observe_palette(&mut self, entries: usize) {
        let entries = u16::try_from(entries).unwrap_or(u16::MAX);
        self.max_colors = self.max_colors.max(entries);
    }

    /// Count a frame and add its delay; returns the new cumulative duration.
    pub(crate) fn record_frame(&mut self, frame: &FrameRecord) -> u64 {
        self.frames += 1;
        self.duration = self.duration.saturating_add(frame.delay_ms);
        self.duration
    }

    /// Apply the disposal rule for frames after the first.
    ///
    /// Clearing a non-empty region to the background exposes transparency
    /// in every mainstream renderer, whatever the background color says.
    pub(crate) fn observe_disposal(&mut self, frame: &FrameRecord, area: u64) {
        if frame.index > 0 && frame.disposal == DisposalMethod::RestoreToBackground && area > 0 {
            self.alpha = true;
        }
    }

    pub(crate) fn mark_alpha(&mut self) {
        self.alpha = true;
    }

    pub(crate) fn alpha(&self) -> bool {
        self.alpha
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn finish(self) -> Result<ProbeResult, ProbeError> {
        if self.frames == 0 {
            return Err(ProbeError::Empty);
        }

        Ok(ProbeResult {
            alpha: self.alpha,
            max_colors: self.max_colors,
            duration: self.duration,
            frames: self.frames,
            width: self.width,
            height: self.height,
        })
    }
}

//! Resource limits and the budget governor that enforces them during a probe.

/// Resource limits for a probe.
///
/// Used to bound the work done on untrusted input. All limits are optional;
/// `None` and `Some(0)` both mean unlimited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum canvas width in pixels.
    pub max_width: Option<u64>,
    /// Maximum canvas height in pixels.
    pub max_height: Option<u64>,
    /// Maximum canvas area (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes held at once by color tables and the first frame's index buffer.
    pub max_memory_bytes: Option<u64>,
    /// Maximum cumulative animation duration in milliseconds.
    pub max_duration_ms: Option<u64>,
}

/// A budget that was breached, with the observed value and the configured limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LimitExceeded {
    #[error("canvas width {actual} exceeds limit {limit}")]
    Width { actual: u64, limit: u64 },
    #[error("canvas height {actual} exceeds limit {limit}")]
    Height { actual: u64, limit: u64 },
    #[error("pixel count {actual} exceeds limit {limit}")]
    Pixels { actual: u64, limit: u64 },
    #[error("memory use of {actual} bytes exceeds limit {limit}")]
    Memory { actual: u64, limit: u64 },
    #[error("duration of {actual} ms exceeds limit {limit}")]
    Duration { actual: u64, limit: u64 },
    /// The allocator refused a buffer that was within budget.
    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: u64 },
}

fn enabled(limit: Option<u64>) -> Option<u64> {
    limit.filter(|&l| l != 0)
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_width(mut self, width: u64) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_max_height(mut self, height: u64) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn with_max_pixels(mut self, pixels: u64) -> Self {
        self.max_pixels = Some(pixels);
        self
    }

    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    pub fn with_max_duration(mut self, ms: u64) -> Self {
        self.max_duration_ms = Some(ms);
        self
    }

    /// Check if canvas dimensions are within limits.
    pub fn check_dimensions(&self, width: u64, height: u64) -> Result<(), LimitExceeded> {
        if let Some(limit) = enabled(self.max_width) {
            if width > limit {
                return Err(LimitExceeded::Width {
                    actual: width,
                    limit,
                });
            }
        }

        if let Some(limit) = enabled(self.max_height) {
            if height > limit {
                return Err(LimitExceeded::Height {
                    actual: height,
                    limit,
                });
            }
        }

        if let Some(limit) = enabled(self.max_pixels) {
            let pixels = width.saturating_mul(height);
            if pixels > limit {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    limit,
                });
            }
        }

        Ok(())
    }

    /// Check if holding `bytes` at once is within limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(limit) = enabled(self.max_memory_bytes) {
            if bytes > limit {
                return Err(LimitExceeded::Memory {
                    actual: bytes,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Check if a cumulative duration is within limits.
    pub fn check_duration(&self, ms: u64) -> Result<(), LimitExceeded> {
        if let Some(limit) = enabled(self.max_duration_ms) {
            if ms > limit {
                return Err(LimitExceeded::Duration { actual: ms, limit });
            }
        }
        Ok(())
    }
}

/// Tracks live allocations of a single probe against its [`Limits`].
#[derive(Debug)]
pub(crate) struct Governor<'a> {
    limits: &'a Limits,
    in_use: u64,
}

impl<'a> Governor<'a> {
    pub(crate) fn new(limits: &'a Limits) -> Self {
        Self { limits, in_use: 0 }
    }

    pub(crate) fn check_canvas(&self, width: u16, height: u16) -> Result<(), LimitExceeded> {
        self.limits.check_dimensions(width.into(), height.into())
    }

    pub(crate) fn check_duration(&self, ms: u64) -> Result<(), LimitExceeded> {
        self.limits.check_duration(ms)
    }

    /// Account for `bytes` about to be allocated alongside everything still held.
    pub(crate) fn reserve(&mut self, bytes: u64) -> Result<(), LimitExceeded> {
        let total = self.in_use.saturating_add(bytes);
        self.limits.check_memory(total)?;
        self.in_use = total;
        Ok(())
    }

    pub(crate) fn release(&mut self, bytes: u64) {
        self.in_use = self.in_use.saturating_sub(bytes);
    }

    pub(crate) fn in_use(&self) -> u64 {
        self.in_use
    }
}

//! # gifprobe
//!
//! Single-pass GIF probing: does the image *actually* render transparent
//! pixels, and how large are its palettes, animation, and canvas?
//!
//! A GIF that declares a transparent index but never draws with it is
//! reported as opaque. Two rules decide transparency:
//!
//! - the first frame declares a transparent index and at least one of its
//!   pixels uses it, or
//! - any later frame is disposed by restoring to the background.
//!
//! Only the first frame's pixel data is ever LZW-decoded, and only when its
//! graphic control declares a transparent index. Every other frame is skipped
//! at the sub-block level. Scanning stops as soon as transparency is
//! confirmed, so `frames` and `duration` then cover the visited frames only.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gifprobe::Limits;
//!
//! let limits = Limits::none()
//!     .with_max_pixels(50_000_000)
//!     .with_max_memory(20 * 1024 * 1024);
//! let probe = gifprobe::from_path("animation.gif", &limits)?;
//! println!("alpha={} frames={} duration={}ms", probe.alpha, probe.frames, probe.duration);
//! # Ok::<(), gifprobe::ProbeError>(())
//! ```

#![forbid(unsafe_code)]

mod block;
mod cursor;
mod error;
mod format;
mod info;
mod limits;
mod lzw;
mod parser;
mod probe;

#[cfg(test)]
mod test_utils;

pub use block::DisposalMethod;
pub use error::{Malformed, ProbeError};
pub use format::{GifVersion, is_gif_extension};
pub use info::{from_bytes, from_path, from_reader};
pub use limits::{LimitExceeded, Limits};
pub use probe::ProbeResult;

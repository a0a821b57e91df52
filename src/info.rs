//! Probe entry points.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::parser::Parser;
use crate::{Limits, ProbeError, ProbeResult};

/// Probe a GIF from any byte source.
///
/// The source is read forward once and never past the point where the
/// result is settled. Wrap unbuffered sources such as files or sockets in a
/// [`BufReader`]; the probe issues many small reads.
pub fn from_reader<R: Read>(reader: R, limits: &Limits) -> Result<ProbeResult, ProbeError> {
    Parser::new(reader, limits).run()
}

/// Probe a GIF held in memory.
pub fn from_bytes(data: &[u8], limits: &Limits) -> Result<ProbeResult, ProbeError> {
    from_reader(data, limits)
}

/// Probe a GIF file.
pub fn from_path(path: impl AsRef<Path>, limits: &Limits) -> Result<ProbeResult, ProbeError> {
    let file = File::open(path).map_err(ProbeError::Io)?;
    from_reader(BufReader::new(file), limits)
}

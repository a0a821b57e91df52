//! JSON rendering of probe results.

use gifprobe::ProbeResult;
use serde::Serialize;

/// Serializable view of a [`ProbeResult`], in output field order.
#[derive(Serialize)]
struct ProbeDisplay {
    alpha: bool,
    max_colors: u16,
    duration: u64,
    frames: u64,
    width: u16,
    height: u16,
}

impl From<&ProbeResult> for ProbeDisplay {
    fn from(result: &ProbeResult) -> Self {
        Self {
            alpha: result.alpha,
            max_colors: result.max_colors,
            duration: result.duration,
            frames: result.frames,
            width: result.width,
            height: result.height,
        }
    }
}

/// Render `result` as one JSON line, or indented when `pretty`.
pub fn render(result: &ProbeResult, pretty: bool) -> anyhow::Result<String> {
    let display = ProbeDisplay::from(result);
    let json = if pretty {
        serde_json::to_string_pretty(&display)?
    } else {
        serde_json::to_string(&display)?
    };
    Ok(json)
}

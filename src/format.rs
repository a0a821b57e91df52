//! GIF signature detection.

/// GIF versions accepted by the probe.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GifVersion {
    Gif87a,
    Gif89a,
}

impl GifVersion {
    /// Length of the signature + version header.
    pub const HEADER_LEN: usize = 6;

    /// Detect the version from the leading bytes. Returns None if unrecognized.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data.get(..Self::HEADER_LEN)? {
            b"GIF87a" => Some(GifVersion::Gif87a),
            b"GIF89a" => Some(GifVersion::Gif89a),
            _ => None,
        }
    }
}

/// Whether a file extension (case-insensitive, without the dot) names a GIF.
pub fn is_gif_extension(ext: &str) -> bool {
    ext.eq_ignore_ascii_case("gif")
}

// ABOUTME: Permissive text decoding for stylesheet and markup inputs.
// ABOUTME: Uses encoding_rs with BOM sniffing; malformed bytes become U+FFFD instead of failing.

use encoding_rs::{Encoding, UTF_8};

use crate::error::{PruneError, Result};

/// Decoded input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Name of the encoding actually used.
    pub encoding: &'static str,
    /// True if any malformed sequence was replaced.
    pub had_errors: bool,
}

/// Looks up an encoding by WHATWG label (`utf-8`, `latin1`, `windows-1252`...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| PruneError::UnknownEncoding(label.to_string()))
}

/// Decodes `bytes`, never failing on malformed input.
///
/// A byte order mark takes precedence; otherwise `label` selects the encoding,
/// falling back to UTF-8.
pub fn decode_text(bytes: &[u8], label: Option<&str>) -> Result<DecodedText> {
    let fallback = match label {
        Some(label) => encoding_for_label(label)?,
        None => UTF_8,
    };
    let (decoded, used, had_errors) = fallback.decode(bytes);
    Ok(DecodedText {
        text: decoded.into_owned(),
        encoding: used.name(),
        had_errors,
    })
}

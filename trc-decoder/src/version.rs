//! Trace file version selection
//!
//! A TRC file announces its layout in the comment header with a
//! `;$FILEVERSION=<value>` directive. The directive must appear before the
//! first data line; without it (or with a version neither grammar covers)
//! there is no safe way to tokenize the body, so selection failure is fatal.

use crate::types::{DecoderError, Result, TraceVersion};

/// Header directive that carries the file format version
pub const FILEVERSION_DIRECTIVE: &str = ";$FILEVERSION=";

/// Pick the trace version from the file's header lines.
///
/// `header_lines` is the leading run of comment lines (each starting with
/// `;`). Version strings are matched by prefix, so `1.3.1` selects the 1.3
/// grammar. Returns [`DecoderError::UnsupportedFormat`] carrying the raw
/// directive value, or `"absent"` when no directive was found.
pub fn select_version<'a, I>(header_lines: I) -> Result<TraceVersion>
where
    I: IntoIterator<Item = &'a str>,
{
    for line in header_lines {
        if let Some(value) = line.strip_prefix(FILEVERSION_DIRECTIVE) {
            let value = value.trim();
            log::debug!("Found file version directive: {}", value);

            if value.starts_with("1.3") {
                return Ok(TraceVersion::V1_3);
            } else if value.starts_with("2.1") {
                return Ok(TraceVersion::V2_1);
            } else {
                return Err(DecoderError::UnsupportedFormat(value.to_string()));
            }
        }
    }

    Err(DecoderError::UnsupportedFormat("absent".to_string()))
}

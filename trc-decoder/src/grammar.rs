//! Per-version trace line grammars
//!
//! PCAN TRC 1.3 and 2.1 record the same terminal fields but in incompatible
//! layouts: 1.3 writes `index) timestamp bus direction id - count bytes`,
//! while 2.1 writes `index timestamp DT bus id direction - count bytes` -
//! the identifier and direction columns swap places and a fixed `DT` frame
//! type tag appears. One grammar cannot serve both, so each version gets its
//! own tokenizer behind a shared trait and [`TraceVersion`] picks one.
//!
//! A grammar either produces a [`RawFrameLine`] or reports "no match"; the
//! caller decides what a non-matching line means. Comment lines are filtered
//! before they ever reach a grammar.

use crate::types::{Direction, RawFrameLine, TraceVersion};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_V1_3: Regex = Regex::new(
        r"^\s*\d+\)\s*([\d\.]+)\s+\d+\s+(Rx|Tx)\s+([0-9A-F]{8})\s*-\s*(\d+)\s+((?:[0-9A-F]{2}\s*){1,8})$"
    )
    .unwrap();
    static ref RE_V2_1: Regex = Regex::new(
        r"^\s*\d+\s+([\d\.]+)\s+DT\s+\d+\s+([0-9A-F]{8})\s+(Rx|Tx)\s*-\s*(\d+)\s+((?:[0-9A-F]{2}\s*){1,8})$"
    )
    .unwrap();
}

/// Tokenizer for one trace file version
///
/// `parse_line` returns `None` for any line that does not have the version's
/// exact shape - that is a normal outcome, not an error.
pub trait LineGrammar: Sync {
    fn parse_line(&self, line: &str) -> Option<RawFrameLine>;
}

/// TRC 1.3 line layout: direction column before the identifier
pub struct V13Grammar;

/// TRC 2.1 line layout: identifier before the direction, `DT` type tag
pub struct V21Grammar;

impl LineGrammar for V13Grammar {
    fn parse_line(&self, line: &str) -> Option<RawFrameLine> {
        let caps = RE_V1_3.captures(line)?;
        build_frame_line(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
            caps.get(4)?.as_str(),
            caps.get(5)?.as_str(),
        )
    }
}

impl LineGrammar for V21Grammar {
    fn parse_line(&self, line: &str) -> Option<RawFrameLine> {
        let caps = RE_V2_1.captures(line)?;
        // Identifier and direction captures are swapped relative to 1.3
        build_frame_line(
            caps.get(1)?.as_str(),
            caps.get(3)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(4)?.as_str(),
            caps.get(5)?.as_str(),
        )
    }
}

impl TraceVersion {
    /// The line grammar for this file version
    pub fn grammar(&self) -> &'static dyn LineGrammar {
        match self {
            TraceVersion::V1_3 => &V13Grammar,
            TraceVersion::V2_1 => &V21Grammar,
        }
    }
}

/// Shared tail of both grammars: validate the numeric fields and split the
/// payload tokens once the version-specific column order is resolved.
fn build_frame_line(
    timestamp: &str,
    direction: &str,
    can_id_hex: &str,
    byte_count: &str,
    data_fields: &str,
) -> Option<RawFrameLine> {
    let direction: Direction = direction.parse().ok()?;
    let can_id = u32::from_str_radix(can_id_hex, 16).ok()?;

    // The regex only guarantees digits; the count itself must be 1..=8
    let byte_count: u8 = byte_count.parse().ok()?;
    if !(1..=8).contains(&byte_count) {
        return None;
    }

    // Token count may legitimately differ from byte_count (short captures
    // appear in real traces); normalization pads the difference.
    let data: Vec<String> = data_fields
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Some(RawFrameLine {
        timestamp: timestamp.to_string(),
        direction,
        can_id,
        can_id_hex: can_id_hex.to_string(),
        byte_count,
        data,
    })
}

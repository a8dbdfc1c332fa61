//! Core types for the TRC decoder library
//!
//! This module defines the types that flow through a parse run: the tokenized
//! form of a trace line, the decomposed J1939 identifier fields, and the
//! normalized record the decoder emits for each matched line.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur while decoding a trace file
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// The file's `;$FILEVERSION=` directive is missing or names a version
    /// the decoder has no grammar for. Carries the raw directive value, or
    /// `"absent"` when the directive was never found.
    #[error("Unsupported trace file version: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Trace file format version, resolved once per file from its header
///
/// All body parsing is parameterized by this tag; there is no default and
/// no per-line renegotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceVersion {
    /// PCAN TRC file version 1.3.x
    V1_3,
    /// PCAN TRC file version 2.1.x
    V2_1,
}

impl fmt::Display for TraceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceVersion::V1_3 => write!(f, "1.3"),
            TraceVersion::V2_1 => write!(f, "2.1"),
        }
    }
}

/// Frame direction as recorded by the capture hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Rx,
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rx => write!(f, "Rx"),
            Direction::Tx => write!(f, "Tx"),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Rx" => Ok(Direction::Rx),
            "Tx" => Ok(Direction::Tx),
            _ => Err(()),
        }
    }
}

/// One trace line after tokenization, before identifier decomposition
///
/// `data.len()` is 1..=8 but is NOT required to equal `byte_count`; the
/// grammars deliberately accept lines that list fewer byte tokens than the
/// count field claims. Normalization pads the gap with empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrameLine {
    /// Timestamp column, kept verbatim (milliseconds offset as decimal text)
    pub timestamp: String,
    pub direction: Direction,
    /// Identifier parsed from the 8-hex-digit column
    pub can_id: u32,
    /// The identifier column exactly as it appeared in the file
    pub can_id_hex: String,
    /// Declared data length, 1..=8
    pub byte_count: u8,
    /// Payload byte tokens, each two hex digits, 1..=8 of them
    pub data: Vec<String>,
}

/// Destination of a J1939 PDU
///
/// Broadcast is a distinct variant rather than a reserved numeric value, so
/// it can never collide with a legitimate node address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DestinationAddress {
    /// PDU format below 0xF0: addressed to every node
    Broadcast,
    /// PDU format 0xF0..=0xFF: addressed to one node
    Node(u8),
}

impl fmt::Display for DestinationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationAddress::Broadcast => write!(f, "All"),
            DestinationAddress::Node(addr) => write!(f, "{:02X}", addr),
        }
    }
}

/// J1939 fields decomposed from a 29-bit extended CAN identifier
///
/// Derived deterministically from the identifier value by
/// [`crate::identifier::decompose`]; no field is ever mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentifierFields {
    /// Message priority, 3 bits (0 = highest)
    pub priority: u8,
    /// Reserved / extended-data-page bit
    pub reserved: u8,
    /// Data page bit
    pub data_page: u8,
    /// PDU format byte; >= 0xF0 means peer-to-peer addressing
    pub pdu_format: u8,
    /// PDU specific byte (destination address or group extension)
    pub pdu_specific: u8,
    /// Parameter group number, always the full 16 bits below the data page
    pub pgn: u16,
    pub source_address: u8,
    pub destination_address: DestinationAddress,
}

/// One fully decoded trace record - the unit the decoder emits
///
/// `data` always holds exactly 8 entries; trailing entries beyond what the
/// trace line listed are empty strings, so a tabular sink can map them
/// one-to-one onto its 8 payload columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub timestamp: String,
    pub direction: Direction,
    /// Original 8-hex-digit identifier text from the trace line
    pub can_id: String,
    pub fields: IdentifierFields,
    pub byte_count: u8,
    /// Exactly 8 payload slots, each a two-hex-digit string or empty
    pub data: Vec<String>,
}

impl NormalizedRecord {
    /// Build a record from a tokenized line, decomposing the identifier and
    /// padding the payload to exactly 8 slots.
    pub fn from_raw(raw: RawFrameLine) -> Self {
        let fields = crate::identifier::decompose(raw.can_id);

        let mut data = raw.data;
        data.resize(8, String::new());

        NormalizedRecord {
            timestamp: raw.timestamp,
            direction: raw.direction,
            can_id: raw.can_id_hex,
            fields,
            byte_count: raw.byte_count,
            data,
        }
    }
}

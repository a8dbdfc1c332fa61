//! TRC Decoder Library
//!
//! A small, stateless library for converting PCAN TRC trace files (versions
//! 1.3 and 2.1) into normalized J1939 frame records.
//!
//! # Architecture
//!
//! The library is intentionally minimal and focused on parsing:
//! - Resolves the trace file version from the `;$FILEVERSION=` header
//!   directive (fatal when missing or unrecognized)
//! - Tokenizes each data line with the grammar for that version
//! - Decomposes the 29-bit extended CAN identifier into its J1939 fields
//!   (priority, PGN, source and destination address, ...)
//! - Emits one [`NormalizedRecord`] per matched line, lazily, and counts
//!   the lines that matched neither grammar shape
//!
//! The library does NOT:
//! - Decide output formatting (column order, delimiters, header rows)
//! - Decode payload bytes semantically
//! - Handle CAN-FD or 11-bit identifiers
//!
//! All of that belongs to the application layer (trc-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use trc_decoder::TrcParser;
//! use std::path::Path;
//!
//! let mut records = TrcParser::parse(Path::new("capture.trc")).unwrap();
//!
//! for record in records.by_ref() {
//!     match record {
//!         Ok(rec) => println!("{} {} PGN {:04X}", rec.timestamp, rec.can_id, rec.fields.pgn),
//!         Err(e) => eprintln!("Read error: {}", e),
//!     }
//! }
//!
//! println!("Skipped {} unmatched lines", records.lines_skipped);
//! ```

// Public modules
pub mod grammar;
pub mod identifier;
pub mod parser;
pub mod types;
pub mod version;

// Re-export main types for convenience
pub use parser::{TrcParser, TrcRecordIterator};
pub use types::{
    DecoderError, DestinationAddress, Direction, IdentifierFields, NormalizedRecord,
    RawFrameLine, Result, TraceVersion,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

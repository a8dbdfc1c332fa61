//! J1939 identifier decomposition
//!
//! A 29-bit extended CAN identifier packs the J1939 addressing fields at
//! fixed bit positions:
//!
//! ```text
//! bits 26-28  priority (3 bits)
//! bit  25     reserved / EDP
//! bit  24     data page
//! bits 16-23  PDU format
//! bits  8-15  PDU specific
//! bits  0-7   source address
//! ```
//!
//! The PGN is the 16 bits from 8 to 23 (PDU format + PDU specific), taken
//! the same way in both addressing modes. PDU format values of 0xF0 and
//! above denote peer-to-peer PDUs whose destination is the PDU specific
//! byte; below 0xF0 the PDU is broadcast and has no single destination.

use crate::types::{DestinationAddress, IdentifierFields};

/// Decompose a CAN identifier into its J1939 fields.
///
/// Pure and total: every 32-bit input produces a valid field set. Bits above
/// the 29 significant ones are not masked off here; identifiers from a trace
/// file are trusted to already be confined to 29 bits.
pub fn decompose(can_id: u32) -> IdentifierFields {
    let priority = ((can_id >> 26) & 0x07) as u8;
    let reserved = ((can_id >> 25) & 0x01) as u8;
    let data_page = ((can_id >> 24) & 0x01) as u8;
    let pdu_format = ((can_id >> 16) & 0xFF) as u8;
    let pdu_specific = ((can_id >> 8) & 0xFF) as u8;
    let pgn = ((can_id >> 8) & 0xFFFF) as u16;
    let source_address = (can_id & 0xFF) as u8;

    // Peer-to-peer range is F0..=FF; everything below is broadcast
    let destination_address = if pdu_format >= 0xF0 {
        DestinationAddress::Node(pdu_specific)
    } else {
        DestinationAddress::Broadcast
    };

    IdentifierFields {
        priority,
        reserved,
        data_page,
        pdu_format,
        pdu_specific,
        pgn,
        source_address,
        destination_address,
    }
}

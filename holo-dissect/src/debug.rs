//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use tracing::debug;

use crate::packet::pdu::{ChecksumStatus, PduKind};
use crate::tree::DecodeOutput;

// Decoder debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    // PDUs
    PduDecodeStart(PduKind, usize, usize),
    PduDecodeEnd(PduKind, &'a DecodeOutput),
    PduChecksum(ChecksumStatus),
    // Attributes
    Descend(u8, u32),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::PduDecodeStart(kind, captured, system_id_len) => {
                // Parent span(s): pdu
                debug!(%kind, %captured, %system_id_len, "{}", self);
            }
            Debug::PduDecodeEnd(_, output) => {
                // Parent span(s): pdu
                let diagnostics = output.diagnostics.len();
                let errors = output.has_errors();
                debug!(%diagnostics, %errors, "{}", self);
            }
            Debug::PduChecksum(status) => {
                // Parent span(s): pdu
                debug!(%status, "{}", self);
            }
            Debug::Descend(code, depth) => {
                // Parent span(s): TLV, sub-TLV
                debug!(%code, %depth, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::PduDecodeStart(..) => {
                write!(f, "decoding PDU")
            }
            Debug::PduDecodeEnd(..) => {
                write!(f, "PDU decoded")
            }
            Debug::PduChecksum(..) => {
                write!(f, "checksum checked")
            }
            Debug::Descend(..) => {
                write!(f, "descending into nested attributes")
            }
        }
    }
}

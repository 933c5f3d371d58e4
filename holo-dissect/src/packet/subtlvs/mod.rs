//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod avaya;
pub mod binding;
pub mod capability;
pub mod neighbor;
pub mod prefix;
pub mod spb;
pub mod srv6;
pub mod trill;

use std::net::Ipv6Addr;
use std::ops::Range;

use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::MsdType;
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

// Segment Identifier, in the format selected by its encoded length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum Sid {
    Label(u32),
    Index(u32),
    Ipv6(Ipv6Addr),
}

// ===== impl Sid =====

impl Sid {
    pub const LABEL_SIZE: usize = 3;
    pub const INDEX_SIZE: usize = 4;
    pub const IPV6_SIZE: usize = 16;
    const LABEL_MASK: u32 = 0x000F_FFFF;

    // Decodes a SID whose format is given by `len`. Returns `None` without
    // consuming anything when no format has that length.
    pub(crate) fn decode(
        buf: &mut BoundedReader,
        len: usize,
    ) -> ReadResult<Option<Self>> {
        let sid = match len {
            Self::LABEL_SIZE => Sid::Label(buf.get_u24()? & Self::LABEL_MASK),
            Self::INDEX_SIZE => Sid::Index(buf.get_u32()?),
            Self::IPV6_SIZE => Sid::Ipv6(buf.get_ipv6()?),
            _ => return Ok(None),
        };
        Ok(Some(sid))
    }
}

impl std::fmt::Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sid::Label(label) => write!(f, "label {}", label),
            Sid::Index(index) => write!(f, "index {}", index),
            Sid::Ipv6(addr) => write!(f, "{}", addr),
        }
    }
}

// ===== global functions =====

// Decodes the SID that fills the rest of `buf`.
//
// Lengths that match no SID format are reported and the bytes are kept
// opaque.
pub(crate) fn decode_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<Option<Sid>> {
    let start = buf.position();
    let len = buf.remaining();
    match Sid::decode(buf, len)? {
        Some(sid) => {
            node.add_leaf("SID", start..buf.position(), sid);
            node.append_text(format!(": {}", sid));
            Ok(Some(sid))
        }
        None => {
            let reason = format!("SID badly formatted ({} bytes)", len);
            dec.malformed(rec, start..buf.end(), reason);
            let bytes = buf.take_rest();
            node.add_leaf("SID", start..buf.end(), hex(&bytes));
            Ok(None)
        }
    }
}

// Checks the V (value) and L (local) flags against the SID length.
//
// The length always decides how the SID is decoded, an inconsistency is
// only reported.
pub(crate) fn check_sid_flags(
    dec: &mut Decoder,
    rec: &AttrRecord,
    range: Range<usize>,
    value: bool,
    local: bool,
) {
    let consistent = match range.len() {
        Sid::LABEL_SIZE => value && local,
        Sid::INDEX_SIZE => !value && !local,
        Sid::IPV6_SIZE => value,
        _ => true,
    };
    if !consistent {
        let reason = format!(
            "V/L flags ({}/{}) inconsistent with {}-byte SID",
            value as u8,
            local as u8,
            range.len()
        );
        dec.malformed(rec, range, reason);
    }
}

// SID/Label sub-TLV: a label or an index, nothing else.
pub(crate) fn decode_sid_label(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length as usize == Sid::IPV6_SIZE {
        let range = buf.position()..buf.end();
        dec.malformed(rec, range.clone(), "Label badly formatted");
        let bytes = buf.take_rest();
        node.add_leaf("SID", range, hex(&bytes));
        return Ok(());
    }
    decode_sid(dec, rec, buf, node)?;
    Ok(())
}

// Node and link MSD sub-TLVs share the same list of type/value pairs.
pub(crate) fn decode_msd(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // Validate the TLV length.
    if rec.length % 2 != 0 {
        dec.malformed(rec, rec.value.clone(), "odd MSD length");
    }

    while buf.remaining() >= 2 {
        let start = buf.position();
        let msd_type = buf.get_u8()?;
        let msd_value = buf.get_u8()?;
        let label = match MsdType::from_u8(msd_type) {
            Some(msd_type) => format!("MSD {}", msd_type),
            None => format!("MSD type {}", msd_type),
        };
        node.add_leaf(label, start..buf.position(), msd_value);
    }

    Ok(())
}

// Decodes a list of 32-bit values, one leaf each.
pub(crate) fn decode_u32_list(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    label: &str,
    render: fn(u32) -> String,
) -> ReadResult<()> {
    // Validate the TLV length.
    if buf.remaining() % 4 != 0 {
        let reason = format!("{} list is not a multiple of 4 bytes", label);
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }

    while buf.remaining() >= 4 {
        let start = buf.position();
        let value = buf.get_u32()?;
        node.add_leaf(label, start..buf.position(), render(value));
    }

    Ok(())
}

pub(crate) fn render_decimal(value: u32) -> String {
    value.to_string()
}

pub(crate) fn render_hex(value: u32) -> String {
    format!("0x{:08x}", value)
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::sync::LazyLock as Lazy;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::attr::cursor::walk_nested;
use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::{BierSubStlvType, PrefixStlvType};
use crate::packet::subtlvs::{
    Sid, check_sid_flags, decode_u32_list, render_decimal,
};
use crate::packet::{algo_text, decode_flags};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct PrefixAttrFlags: u8 {
        const X = 0x80;
        const R = 0x40;
        const N = 0x20;
        const E = 0x10;
        const A = 0x08;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct PrefixSidFlags: u8 {
        const R = 0x80;
        const N = 0x40;
        const P = 0x20;
        const E = 0x10;
        const V = 0x08;
        const L = 0x04;
    }
}

// Prefix-SID: flags, algorithm, then a label (5 bytes in total) or an index
// (6 bytes in total).
const PREFIX_SID_LABEL_LEN: u8 = 5;
const PREFIX_SID_INDEX_LEN: u8 = 6;

// Sub-TLVs of the prefix reachability TLVs (135, 235, 236 and 237).
pub static PREFIX_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use PrefixStlvType as Stlv;
    AttributeRegistry::new("prefix-stlvs")
        .register(
            Stlv::AdminTag32 as u8,
            HandlerDescriptor::new("32-bit Administrative Tag", decode_tag32)
                .with_min_length(4),
        )
        .register(
            Stlv::AdminTag64 as u8,
            HandlerDescriptor::new("64-bit Administrative Tag", decode_tag64)
                .with_min_length(8),
        )
        .register(
            Stlv::PrefixSid as u8,
            HandlerDescriptor::new("Prefix-SID", decode_prefix_sid)
                .with_min_length(PREFIX_SID_LABEL_LEN)
                .with_max_length(PREFIX_SID_INDEX_LEN),
        )
        .register(
            Stlv::PrefixAttributeFlags as u8,
            HandlerDescriptor::new(
                "Prefix Attribute Flags",
                decode_prefix_attr_flags,
            )
            .with_length(1),
        )
        .register(
            Stlv::Ipv4SourceRouterId as u8,
            HandlerDescriptor::new("IPv4 Source Router ID", decode_ipv4_rid)
                .with_length(4),
        )
        .register(
            Stlv::Ipv6SourceRouterId as u8,
            HandlerDescriptor::new("IPv6 Source Router ID", decode_ipv6_rid)
                .with_length(16),
        )
        .register(
            Stlv::BierInfo as u8,
            HandlerDescriptor::new("BIER Info", decode_bier_info)
                .with_min_length(5),
        )
});

// Sub-sub-TLVs of the BIER Info sub-TLV.
pub static BIER_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::new("bier-stlvs").register(
        BierSubStlvType::MplsEncap as u8,
        HandlerDescriptor::new("BIER MPLS Encapsulation", decode_bier_mpls)
            .with_length(4),
    )
});

// ===== global functions =====

fn decode_tag32(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_u32_list(dec, rec, buf, node, "Tag", render_decimal)
}

fn decode_tag64(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length % 8 != 0 {
        let reason = "64-bit tag list is not a multiple of 8 bytes";
        dec.malformed(rec, rec.value.clone(), reason);
    }
    while buf.remaining() >= 8 {
        let tag = node.add_field("Tag", buf, BoundedReader::get_u64)?;
        node.append_text(format!(" {}", tag));
    }
    Ok(())
}

// Shared with the SID/Label Binding TLVs.
pub(crate) fn decode_prefix_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let flags = decode_flags::<PrefixSidFlags>(buf, node)?;
    let start = buf.position();
    let algo = buf.get_u8()?;
    node.add_leaf("Algorithm", start..buf.position(), algo_text(algo));

    let range = buf.position()..buf.end();
    match rec.length {
        PREFIX_SID_LABEL_LEN | PREFIX_SID_INDEX_LEN => {
            check_sid_flags(
                dec,
                rec,
                range.clone(),
                flags.contains(PrefixSidFlags::V),
                flags.contains(PrefixSidFlags::L),
            );
            if let Some(sid) = Sid::decode(buf, range.len())? {
                node.add_leaf("SID", range, sid);
                node.append_text(format!(": {}", sid));
            }
        }
        _ => {
            // The length check in the walk already reported this.
            let bytes = buf.take_rest();
            node.add_leaf("SID", range, hex(&bytes));
        }
    }
    Ok(())
}

// Shared with the SRv6 Locator TLV.
pub(crate) fn decode_prefix_attr_flags(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // A length of zero is permitted under RFC 7794.
    if buf.remaining() == 0 {
        return Ok(());
    }
    // Any remaining bytes beyond the first one are ignored.
    decode_flags::<PrefixAttrFlags>(buf, node)?;
    Ok(())
}

fn decode_ipv4_rid(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Router ID", buf, BoundedReader::get_ipv4)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_ipv6_rid(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Router ID", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_bier_info(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("BAR", buf, BoundedReader::get_u8)?;
    node.add_field("IPA", buf, BoundedReader::get_u8)?;
    let sd_id = node.add_field("Sub-domain ID", buf, BoundedReader::get_u8)?;
    let bfr_id = node.add_field("BFR-ID", buf, BoundedReader::get_u16)?;
    node.append_text(format!(": sub-domain {}, BFR-ID {}", sd_id, bfr_id));

    walk_nested(dec, rec, buf, &BIER_STLVS, node);
    Ok(())
}

fn decode_bier_mpls(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("Max SI", buf, BoundedReader::get_u8)?;
    let start = buf.position();
    let value = buf.get_u24()?;
    node.add_leaf("BS Length", start..start + 1, value >> 20);
    node.add_leaf("Label", start..buf.position(), value & 0x000F_FFFF);
    Ok(())
}

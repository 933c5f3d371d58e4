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
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::attr::cursor::walk_nested;
use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::{
    Srv6EndpointBehavior, Srv6LocatorStlvType, Srv6SidStlvType,
};
use crate::packet::subtlvs::prefix::decode_prefix_attr_flags;
use crate::packet::{SystemId, algo_text, decode_flags, decode_mt_id};
use crate::reader::{BoundedReader, prefix_wire_len};
use crate::tree::FieldNode;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LocatorFlags: u8 {
        const D = 0x80;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct EndXSidFlags: u8 {
        const B = 0x80;
        const S = 0x40;
        const P = 0x20;
    }
}

// Flags, algorithm, weight, behavior, SID and sub-sub-TLV length.
pub(crate) const END_X_SID_MIN_SIZE: u8 = 22;
// Flags, behavior, SID and sub-sub-TLV length.
pub(crate) const END_SID_MIN_SIZE: u8 = 20;
// MT ID plus one minimal locator entry.
pub(crate) const LOCATOR_MIN_SIZE: u8 = 11;
// Metric, flags, algorithm, locator size, one locator byte and sub-TLV
// length.
const LOCATOR_ENTRY_MIN_SIZE: usize = 9;
const LOCATOR_MAX_SIZE: u8 = 128;

// Sub-TLVs of the SRv6 Locator TLV.
pub static LOCATOR_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::new("srv6-locator-stlvs")
        .register(
            Srv6LocatorStlvType::PrefixAttributeFlags as u8,
            HandlerDescriptor::new(
                "Prefix Attribute Flags",
                decode_prefix_attr_flags,
            )
            .with_length(1),
        )
        .register(
            Srv6LocatorStlvType::EndSid as u8,
            HandlerDescriptor::new("SRv6 End SID", decode_end_sid)
                .with_min_length(END_SID_MIN_SIZE),
        )
});

// Sub-sub-TLVs of the SRv6 SID sub-TLVs.
pub static SID_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::new("srv6-sid-stlvs").register(
        Srv6SidStlvType::SidStructure as u8,
        HandlerDescriptor::new("SRv6 SID Structure", decode_sid_structure)
            .with_length(4),
    )
});

// ===== global functions =====

// SRv6 Locator TLV.
pub(crate) fn decode_locator(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_mt_id(buf, node)?;

    while buf.remaining() > 0 {
        let start = buf.position();

        // Validate the entry length.
        if buf.remaining() < LOCATOR_ENTRY_MIN_SIZE {
            let reason =
                format!("short locator entry ({} bytes)", buf.remaining());
            dec.malformed(rec, start..buf.end(), reason);
            buf.take_rest();
            break;
        }

        let entry = node.add_subtree("Locator entry", start..buf.end());
        entry.add_field("Metric", buf, BoundedReader::get_u32)?;
        decode_flags::<LocatorFlags>(buf, entry)?;
        let algo_start = buf.position();
        let algo = buf.get_u8()?;
        entry.add_leaf(
            "Algorithm",
            algo_start..buf.position(),
            algo_text(algo),
        );
        let loc_size =
            entry.add_field("Locator Size", buf, BoundedReader::get_u8)?;
        if loc_size == 0 || loc_size > LOCATOR_MAX_SIZE {
            let reason = format!("invalid locator size {}", loc_size);
            dec.malformed(rec, start..buf.end(), reason);
            entry.range = start..buf.position();
            buf.take_rest();
            break;
        }
        // The next entry can't be located if this one is cut short.
        if prefix_wire_len(loc_size) + 1 > buf.remaining() {
            let reason = format!("locator size {} exceeds the TLV", loc_size);
            dec.malformed(rec, start..buf.end(), reason);
            entry.range = start..buf.position();
            buf.take_rest();
            break;
        }
        let loc_start = buf.position();
        let locator = buf.get_ipv6_prefix(loc_size)?;
        entry.add_leaf(
            "Locator",
            loc_start..buf.position(),
            format!("{}/{}", locator, loc_size),
        );
        entry.append_text(format!(": {}/{}", locator, loc_size));

        let stlv_len =
            entry.add_field("Sub-TLV Length", buf, BoundedReader::get_u8)?;
        if stlv_len as usize > buf.remaining() {
            let reason =
                format!("sub-TLV length {} exceeds the TLV", stlv_len);
            dec.malformed(rec, start..buf.end(), reason);
            entry.range = start..buf.position();
            buf.take_rest();
            break;
        }
        let mut stlvs = buf.split_to(stlv_len as usize)?;
        walk_nested(dec, rec, &mut stlvs, &LOCATOR_STLVS, entry);
        entry.range = start..buf.position();
    }

    Ok(())
}

fn decode_end_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // No flags are defined for End SIDs.
    node.add_field("Flags", buf, BoundedReader::get_u8)?;
    decode_behavior(buf, node)?;
    let sid = node.add_field("SID", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", sid));
    decode_sid_stlvs(dec, rec, buf, node)
}

pub(crate) fn decode_end_x_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_end_x_common(dec, rec, buf, node)
}

pub(crate) fn decode_lan_end_x_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let system_id = SystemId::decode(buf, dec.system_id_len())?;
    node.add_leaf("System-ID", start..buf.position(), system_id);
    decode_end_x_common(dec, rec, buf, node)
}

fn decode_end_x_common(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_flags::<EndXSidFlags>(buf, node)?;
    let start = buf.position();
    let algo = buf.get_u8()?;
    node.add_leaf("Algorithm", start..buf.position(), algo_text(algo));
    node.add_field("Weight", buf, BoundedReader::get_u8)?;
    decode_behavior(buf, node)?;
    let sid = node.add_field("SID", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", sid));
    decode_sid_stlvs(dec, rec, buf, node)
}

fn decode_behavior(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<u16> {
    let start = buf.position();
    let behavior = buf.get_u16()?;
    let text = match Srv6EndpointBehavior::from_u16(behavior) {
        Some(name) => format!("{} ({})", behavior, name),
        None => behavior.to_string(),
    };
    node.add_leaf("Endpoint Behavior", start..buf.position(), text);
    Ok(behavior)
}

// Sub-sub-TLV length followed by the sub-sub-TLVs themselves.
fn decode_sid_stlvs(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let stlv_len =
        node.add_field("Sub-sub-TLV Length", buf, BoundedReader::get_u8)?;
    if stlv_len as usize > buf.remaining() {
        let reason =
            format!("sub-sub-TLV length {} exceeds the sub-TLV", stlv_len);
        dec.malformed(rec, buf.position()..buf.end(), reason);
        buf.take_rest();
        return Ok(());
    }
    let mut stlvs = buf.split_to(stlv_len as usize)?;
    walk_nested(dec, rec, &mut stlvs, &SID_STLVS, node);
    Ok(())
}

fn decode_sid_structure(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get = BoundedReader::get_u8;
    let lb = node.add_field("Locator Block Length", buf, get)?;
    let ln = node.add_field("Locator Node Length", buf, get)?;
    let fun = node.add_field("Function Length", buf, get)?;
    let arg = node.add_field("Argument Length", buf, get)?;
    node.append_text(format!(": {}/{}/{}/{}", lb, ln, fun, arg));
    Ok(())
}

// ===== unit tests =====

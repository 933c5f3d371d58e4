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
use crate::packet::consts::LabelBindingStlvType;
use crate::packet::subtlvs::decode_sid_label;
use crate::packet::subtlvs::prefix::decode_prefix_sid;
use crate::packet::{decode_flags, decode_mt_id};
use crate::reader::BoundedReader;
use crate::tree::FieldNode;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct BindingFlags: u8 {
        const F = 0x80;
        const M = 0x40;
        const S = 0x20;
        const D = 0x10;
        const A = 0x08;
    }
}

// Flags, weight, range and prefix length.
pub(crate) const BINDING_MIN_SIZE: u8 = 5;

// Sub-TLVs of the SID/Label Binding TLVs.
pub static BINDING_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::new("binding-stlvs")
        .register(
            LabelBindingStlvType::SidLabel as u8,
            HandlerDescriptor::new("SID/Label", decode_sid_label)
                .with_min_length(3)
                .with_max_length(4),
        )
        .register(
            LabelBindingStlvType::PrefixSid as u8,
            HandlerDescriptor::new("Prefix-SID", decode_prefix_sid)
                .with_min_length(5)
                .with_max_length(6),
        )
});

// ===== global functions =====

// SID/Label Binding TLV.
pub(crate) fn decode_binding(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let flags = decode_flags::<BindingFlags>(buf, node)?;
    node.add_field("Weight", buf, BoundedReader::get_u8)?;
    node.add_field("Range", buf, BoundedReader::get_u16)?;

    // The F flag selects the address family of the FEC prefix.
    let start = buf.position();
    let plen = buf.get_u8()?;
    node.add_leaf("Prefix Length", start..buf.position(), plen);
    let max_plen = if flags.contains(BindingFlags::F) { 128 } else { 32 };
    if plen > max_plen {
        let reason = format!("invalid prefix length {}", plen);
        dec.malformed(rec, start..buf.position(), reason);
        buf.take_rest();
        return Ok(());
    }
    let start = buf.position();
    let prefix = if flags.contains(BindingFlags::F) {
        buf.get_ipv6_prefix(plen)?.to_string()
    } else {
        buf.get_ipv4_prefix(plen)?.to_string()
    };
    node.add_leaf(
        "FEC Prefix",
        start..buf.position(),
        format!("{}/{}", prefix, plen),
    );
    node.append_text(format!(": {}/{}", prefix, plen));

    walk_nested(dec, rec, buf, &BINDING_STLVS, node);
    Ok(())
}

// Multi-Topology SID/Label Binding TLV.
pub(crate) fn decode_mt_binding(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_mt_id(buf, node)?;
    decode_binding(dec, rec, buf, node)
}

// ===== unit tests =====

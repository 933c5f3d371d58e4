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
use crate::attr::{AttrRecord, Decoder, TLV_HDR_SIZE};
use crate::error::ReadResult;
use crate::packet::consts::{
    FadStlvType, LabelBindingStlvType, RouterCapStlvType,
};
use crate::packet::subtlvs::{
    decode_msd, decode_sid_label, decode_u32_list, render_decimal, render_hex,
    trill,
};
use crate::packet::{algo_text, decode_flags, flags_text};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct TeNodeCapFlags: u8 {
        const B = 0x80;
        const E = 0x40;
        const M = 0x20;
        const G = 0x10;
        const P = 0x08;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct SrCapabilitiesFlags: u8 {
        const I = 0x80;
        const V = 0x40;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct Srv6CapFlags: u16 {
        const O = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct FadFlags: u8 {
        const M = 0x80;
    }
}

// Sub-TLVs of the Router Capability TLV.
pub static ROUTER_CAP_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use RouterCapStlvType as Stlv;
    let registry = AttributeRegistry::new("router-cap-stlvs")
        .register(
            Stlv::TeNodeCapDescriptor as u8,
            HandlerDescriptor::new(
                "TE Node Capability Descriptor",
                decode_te_node_cap,
            )
            .with_min_length(1),
        )
        .register(
            Stlv::Ipv6TeRouterId as u8,
            HandlerDescriptor::new("IPv6 TE Router ID", decode_ipv6_te_rtr_id)
                .with_length(16),
        )
        .register(
            Stlv::SrCapability as u8,
            HandlerDescriptor::new("SR-Capabilities", decode_label_blocks)
                .with_min_length(1),
        )
        .register(
            Stlv::SrAlgorithm as u8,
            HandlerDescriptor::new("SR-Algorithms", decode_sr_algos)
                .with_min_length(1),
        )
        .register(
            Stlv::NodeAdminTag as u8,
            HandlerDescriptor::new("Node Admin Tag", decode_node_tags)
                .with_min_length(4),
        )
        .register(
            Stlv::SrLocalBlock as u8,
            HandlerDescriptor::new("SR Local Block", decode_label_blocks)
                .with_min_length(1),
        )
        .register(
            Stlv::NodeMsd as u8,
            HandlerDescriptor::new("Node MSD", decode_msd),
        )
        .register(
            Stlv::Srv6Capability as u8,
            HandlerDescriptor::new("SRv6 Capabilities", decode_srv6_cap)
                .with_min_length(2),
        )
        .register(
            Stlv::FlexAlgoDefinition as u8,
            HandlerDescriptor::new("Flexible Algorithm Definition", decode_fad)
                .with_min_length(4),
        );
    trill::register(registry)
});

// The SID/Label sub-TLV following each SRGB/SRLB range.
pub static SID_LABEL_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::new("sid-label-stlvs").register(
        LabelBindingStlvType::SidLabel as u8,
        HandlerDescriptor::new("SID/Label", decode_sid_label)
            .with_min_length(3)
            .with_max_length(4),
    )
});

// Sub-sub-TLVs of the Flexible Algorithm Definition sub-TLV.
pub static FAD_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use FadStlvType as Stlv;
    AttributeRegistry::new("fad-stlvs")
        .register(
            Stlv::ExcludeAdminGroup as u8,
            HandlerDescriptor::new("Exclude Admin Group", decode_admin_groups),
        )
        .register(
            Stlv::IncludeAnyAdminGroup as u8,
            HandlerDescriptor::new(
                "Include-Any Admin Group",
                decode_admin_groups,
            ),
        )
        .register(
            Stlv::IncludeAllAdminGroup as u8,
            HandlerDescriptor::new(
                "Include-All Admin Group",
                decode_admin_groups,
            ),
        )
        .register(
            Stlv::Flags as u8,
            HandlerDescriptor::new(
                "Flexible Algorithm Definition Flags",
                decode_fad_flags,
            )
            .with_min_length(1),
        )
        .register(
            Stlv::ExcludeSrlg as u8,
            HandlerDescriptor::new("Exclude SRLG", decode_srlgs),
        )
});

// ===== global functions =====

// SR-Capabilities and SR Local Block: flags, then one or more ranges each
// followed by a SID/Label sub-TLV giving the first value of the range.
fn decode_label_blocks(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_flags::<SrCapabilitiesFlags>(buf, node)?;

    while buf.remaining() > 0 {
        let start = buf.position();

        // Validate the entry length.
        if buf.remaining() < 3 + TLV_HDR_SIZE {
            let reason =
                format!("short range entry ({} bytes)", buf.remaining());
            dec.malformed(rec, start..buf.end(), reason);
            buf.take_rest();
            break;
        }
        let stlv_len = buf.read_u8(start + 4)? as usize;
        if 3 + TLV_HDR_SIZE + stlv_len > buf.remaining() {
            let reason =
                format!("SID/Label length {} exceeds the entry", stlv_len);
            dec.malformed(rec, start..buf.end(), reason);
            buf.take_rest();
            break;
        }

        let mut entry_buf = buf.split_to(3 + TLV_HDR_SIZE + stlv_len)?;
        let entry = node.add_subtree("Range entry", entry_buf.range());
        let range =
            entry.add_field("Range", &mut entry_buf, BoundedReader::get_u24)?;
        entry.append_text(format!(": {}", range));
        walk_nested(dec, rec, &mut entry_buf, &SID_LABEL_STLVS, entry);
    }

    Ok(())
}

fn decode_te_node_cap(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // Only the first byte carries defined bits.
    decode_flags::<TeNodeCapFlags>(buf, node)?;
    Ok(())
}

fn decode_ipv6_te_rtr_id(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Router ID", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_sr_algos(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    while buf.remaining() > 0 {
        let start = buf.position();
        let algo = buf.get_u8()?;
        node.add_leaf("Algorithm", start..buf.position(), algo_text(algo));
    }
    Ok(())
}

fn decode_node_tags(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_u32_list(dec, rec, buf, node, "Node Admin Tag", render_decimal)
}

fn decode_srv6_cap(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let flags = Srv6CapFlags::from_bits_retain(buf.get_u16()?);
    node.add_leaf("Flags", start..buf.position(), flags_text(&flags));

    // No sub-sub-TLVs are defined for this sub-TLV yet.
    if buf.remaining() > 0 {
        let range = buf.position()..buf.end();
        let data = buf.take_rest();
        node.add_leaf("Sub-sub-TLVs", range, hex(&data));
    }
    Ok(())
}

fn decode_fad(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let algo = buf.get_u8()?;
    node.add_leaf("Flex-Algorithm", start..buf.position(), algo);
    node.add_field("Metric-Type", buf, BoundedReader::get_u8)?;
    let start = buf.position();
    let calc_type = buf.get_u8()?;
    node.add_leaf("Calc-Type", start..buf.position(), algo_text(calc_type));
    node.add_field("Priority", buf, BoundedReader::get_u8)?;
    node.append_text(format!(": {}", algo));

    walk_nested(dec, rec, buf, &FAD_STLVS, node);
    Ok(())
}

fn decode_admin_groups(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_u32_list(dec, rec, buf, node, "Extended Admin Group", render_hex)
}

fn decode_fad_flags(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // Only the first byte carries defined flags.
    decode_flags::<FadFlags>(buf, node)?;
    Ok(())
}

fn decode_srlgs(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_u32_list(dec, rec, buf, node, "SRLG", render_decimal)
}

// ===== unit tests =====

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

//! TRILL (Transparent Interconnection of Lots of Links) Sub-TLVs.
//!
//! These are defined in RFC 7176 and may be carried both in the Router
//! Capability TLV (242) and in the MT-Capability TLV (144).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::RouterCapStlvType;
use crate::packet::flags_text;
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct TrillCapFlags: u32 {
        const AFFINITY = 0x8000_0000;
        const FGL_SAFE = 0x4000_0000;
    }
}

const NICKNAME_ENTRY_SIZE: usize = 5;
const ROOT_BRIDGE_ID_SIZE: usize = 6;
const VLAN_ID_MASK: u16 = 0x0fff;
const MCAST_IPV4: u16 = 0x8000;
const MCAST_IPV6: u16 = 0x4000;
const OTHER_CAPS_MASK: u32 = 0x3ffc_0000;
const EXT_HDR_FLAGS_MASK: u32 = 0x0003_ffff;

// ===== global functions =====

// Adds the TRILL sub-TLVs to `registry`.
pub(crate) fn register(registry: AttributeRegistry) -> AttributeRegistry {
    use RouterCapStlvType as Stlv;
    registry
        .register(
            Stlv::TrillNickname as u8,
            HandlerDescriptor::new("Nickname", decode_nickname)
                .with_min_length(NICKNAME_ENTRY_SIZE as u8),
        )
        .register(
            Stlv::TrillTrees as u8,
            HandlerDescriptor::new("Trees", decode_trees).with_length(6),
        )
        .register(
            Stlv::TrillTreeRootIds as u8,
            HandlerDescriptor::new("Tree root identifiers", decode_tree_ids)
                .with_min_length(2),
        )
        .register(
            Stlv::TrillTreesUsedIds as u8,
            HandlerDescriptor::new("Trees used identifiers", decode_tree_ids)
                .with_min_length(2),
        )
        .register(
            Stlv::TrillInterestedVlans as u8,
            HandlerDescriptor::new(
                "Interested VLANs and spanning tree roots",
                decode_interested_vlans,
            )
            .with_min_length(10),
        )
        .register(
            Stlv::TrillVersion as u8,
            HandlerDescriptor::new("TRILL version", decode_version)
                .with_min_length(1),
        )
        .register(
            Stlv::TrillVlanGroup as u8,
            HandlerDescriptor::new("VLAN group", decode_vlan_group)
                .with_min_length(2),
        )
}

fn nickname_text(nickname: u16) -> String {
    format!("0x{:04x} ({})", nickname, nickname)
}

fn decode_nickname_field(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    label: impl Into<String>,
) -> ReadResult<u16> {
    let start = buf.position();
    let nickname = buf.get_u16()?;
    node.add_leaf(label, start..buf.position(), nickname_text(nickname));
    Ok(nickname)
}

fn decode_nickname(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if buf.remaining() % NICKNAME_ENTRY_SIZE != 0 {
        let reason = "nickname entries are not a multiple of 5 bytes";
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }

    while buf.remaining() >= NICKNAME_ENTRY_SIZE {
        let start = buf.position();
        let entry = node.add_subtree(
            "Nickname entry",
            start..start + NICKNAME_ENTRY_SIZE,
        );
        let get = BoundedReader::get_u8;
        entry.add_field("Nickname priority", buf, get)?;
        let get = BoundedReader::get_u16;
        entry.add_field("Tree root priority", buf, get)?;
        let nickname = decode_nickname_field(buf, entry, "Nickname")?;
        entry.append_text(format!(": {}", nickname_text(nickname)));
    }

    Ok(())
}

fn decode_trees(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get = BoundedReader::get_u16;
    node.add_field("Number of trees to compute", buf, get)?;
    node.add_field("Maximum number of trees to compute", buf, get)?;
    node.add_field("Number of trees to use", buf, get)?;
    Ok(())
}

// Tree root and trees used identifiers: the number of the first tree,
// followed by one nickname per tree.
fn decode_tree_ids(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let first =
        node.add_field("Starting tree number", buf, BoundedReader::get_u16)?;

    if buf.remaining() % 2 != 0 {
        dec.malformed(rec, buf.position()..buf.end(), "odd nickname list");
    }
    let mut tree = first as u32;
    while buf.remaining() >= 2 {
        decode_nickname_field(buf, node, format!("Nickname (tree {})", tree))?;
        tree += 1;
    }

    Ok(())
}

fn decode_interested_vlans(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_nickname_field(buf, node, "Nickname")?;

    let start = buf.position();
    let value = buf.get_u16()?;
    let range = start..buf.position();
    let mcast_ipv4 = (value & MCAST_IPV4 != 0) as u8;
    let mcast_ipv6 = (value & MCAST_IPV6 != 0) as u8;
    node.add_leaf("IPv4 multicast router", range.clone(), mcast_ipv4);
    node.add_leaf("IPv6 multicast router", range.clone(), mcast_ipv6);
    let vlan_start = value & VLAN_ID_MASK;
    node.add_leaf("VLAN start ID", range, vlan_start);

    let start = buf.position();
    let vlan_end = buf.get_u16()? & VLAN_ID_MASK;
    node.add_leaf("VLAN end ID", start..buf.position(), vlan_end);
    node.append_text(format!(": VLANs {}-{}", vlan_start, vlan_end));

    node.add_field(
        "Appointed forwarder state lost counter",
        buf,
        BoundedReader::get_u32,
    )?;

    if buf.remaining() % ROOT_BRIDGE_ID_SIZE != 0 {
        let reason = "root bridge IDs are not a multiple of 6 bytes";
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }
    while buf.remaining() >= ROOT_BRIDGE_ID_SIZE {
        let start = buf.position();
        let root = buf.get_bytes(ROOT_BRIDGE_ID_SIZE)?;
        node.add_leaf("Root bridge ID", start..buf.position(), hex(&root));
    }

    Ok(())
}

fn decode_version(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let version =
        node.add_field("Maximum version", buf, BoundedReader::get_u8)?;
    node.append_text(format!(": {}", version));

    // The capabilities word is optional.
    if buf.remaining() >= 4 {
        let start = buf.position();
        let value = buf.get_u32()?;
        let range = start..buf.position();
        let flags = TrillCapFlags::from_bits_truncate(value);
        node.add_leaf("Capabilities", range.clone(), flags_text(&flags));
        node.add_leaf(
            "Other capabilities",
            range.clone(),
            format!("0x{:04x}", (value & OTHER_CAPS_MASK) >> 18),
        );
        node.add_leaf(
            "Extended header flags",
            range,
            format!("0x{:05x}", value & EXT_HDR_FLAGS_MASK),
        );
    }

    Ok(())
}

fn decode_vlan_group(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let primary = buf.get_u16()? & VLAN_ID_MASK;
    node.add_leaf("Primary VLAN ID", start..buf.position(), primary);
    node.append_text(format!(": {}", primary));

    if buf.remaining() % 2 != 0 {
        dec.malformed(rec, buf.position()..buf.end(), "odd VLAN ID list");
    }
    while buf.remaining() >= 2 {
        let start = buf.position();
        let secondary = buf.get_u16()? & VLAN_ID_MASK;
        node.add_leaf("Secondary VLAN ID", start..buf.position(), secondary);
    }

    Ok(())
}

// ===== unit tests =====

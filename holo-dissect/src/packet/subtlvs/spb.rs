//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

//! SPB (Shortest Path Bridging) Sub-TLVs.
//!
//! This module decodes the MT-Capability TLV (144) and the SPB Sub-TLVs it
//! carries, as defined in RFC 6329. The TRILL Sub-TLVs of RFC 7176 can show
//! up in the same TLV.

use std::sync::LazyLock as Lazy;

use bitflags::bitflags;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::attr::cursor::walk_nested;
use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::MtCapStlvType;
use crate::packet::subtlvs::{render_hex, trill};
use crate::packet::{
    MAC_ADDR_LEN, decode_flags, decode_mac, decode_mt_id, flags_text,
    mac_text, mt_id_text,
};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

/// I-SID (Service Identifier) entry within the SPBM-SI Sub-TLV.
///
/// Format (4 bytes):
/// ```text
/// |T|R|  Reserved (6 bits) |     I-SID (24 bits)           |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct IsidEntry {
    pub flags: IsidFlags,
    pub isid: u32,
}

bitflags! {
    /// Transmit and receive membership, shared by I-SID entries and SPBV
    /// MAC address entries.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct IsidFlags: u8 {
        const T = 0x80;
        const R = 0x40;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct VlanTupleFlags: u8 {
        const U = 0x80;
        const M = 0x40;
        const A = 0x20;
    }
}

// CIST root, external root path cost, bridge priority, V/SPSourceID and
// number of trees.
const SPB_INST_MIN_SIZE: u8 = 19;
const CIST_ROOT_ID_LEN: usize = 8;
const VLAN_TUPLE_SIZE: usize = 8;
const SPB_INST_V_BIT: u32 = 0x0010_0000;
const SPSOURCEID_MASK: u32 = 0x000f_ffff;
// B-MAC plus Base VID.
const SPBM_SI_MIN_SIZE: u8 = 8;
const SPBV_MAC_ENTRY_SIZE: usize = 7;
const MT_CAP_OVERLOAD: u8 = 0x80;
const VID_MASK: u16 = 0x0fff;

// Sub-TLVs of the MT-Capability TLV.
pub static MT_CAP_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use MtCapStlvType as Stlv;
    let registry = AttributeRegistry::new("mt-cap-stlvs")
        .register(
            Stlv::SpbInstance as u8,
            HandlerDescriptor::new("SPB Instance", decode_spb_instance)
                .with_min_length(SPB_INST_MIN_SIZE),
        )
        .register(
            Stlv::SpbOpaqueAlgo as u8,
            HandlerDescriptor::new(
                "SPB Opaque ECT Algorithm",
                decode_spb_opaque_algo,
            )
            .with_min_length(4),
        )
        .register(
            Stlv::SpbmSi as u8,
            HandlerDescriptor::new(
                "SPBM Service Identifier and Unicast Address",
                decode_spbm_si,
            )
            .with_min_length(SPBM_SI_MIN_SIZE),
        )
        .register(
            Stlv::SpbvMacAddr as u8,
            HandlerDescriptor::new("SPBV MAC Address", decode_spbv_mac)
                .with_min_length(2),
        );
    trill::register(registry)
});

// ===== impl IsidEntry =====

impl IsidEntry {
    pub const SIZE: usize = 4;

    pub(crate) fn decode(buf: &mut BoundedReader) -> ReadResult<Self> {
        // T|R|Reserved(6 bits).
        let flags = IsidFlags::from_bits_truncate(buf.get_u8()?);
        let isid = buf.get_u24()?;
        Ok(IsidEntry { flags, isid })
    }
}

impl std::fmt::Display for IsidEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, flags {}", self.isid, flags_text(&self.flags))
    }
}

// ===== global functions =====

// MT-Capability TLV: MT ID with the overload bit, followed by sub-TLVs.
pub(crate) fn decode_mt_cap(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let overload = buf.read_u8(start)? & MT_CAP_OVERLOAD != 0;
    let mt_id = decode_mt_id(buf, node)?;
    node.add_leaf("Overload", start..buf.position(), overload as u8);
    node.append_text(format!(": {}", mt_id_text(mt_id)));

    walk_nested(dec, rec, buf, &MT_CAP_STLVS, node);
    Ok(())
}

fn decode_spb_instance(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let root = buf.get_bytes(CIST_ROOT_ID_LEN)?;
    node.add_leaf(
        "CIST Root Identifier",
        start..buf.position(),
        root.iter().map(|byte| format!("{:02x}", byte)).join("-"),
    );
    let get = BoundedReader::get_u32;
    node.add_field("CIST External Root Path Cost", buf, get)?;
    node.add_field("Bridge Priority", buf, BoundedReader::get_u16)?;
    let start = buf.position();
    let value = buf.get_u32()?;
    let range = start..buf.position();
    node.add_leaf("V", range.clone(), (value & SPB_INST_V_BIT != 0) as u8);
    node.add_leaf("SPSourceID", range, value & SPSOURCEID_MASK);
    let num_trees_start = buf.position();
    let num_trees =
        node.add_field("Number of Trees", buf, BoundedReader::get_u8)?;

    // Validate the number of trees.
    if num_trees == 0 {
        let range = num_trees_start..buf.position();
        dec.malformed(rec, range, "zero trees");
    }
    if buf.remaining() != num_trees as usize * VLAN_TUPLE_SIZE {
        let reason = "sub-TLV length doesn't match number of trees";
        dec.malformed(rec, buf.position()..buf.end(), reason);
        buf.take_rest();
        return Ok(());
    }

    while buf.remaining() >= VLAN_TUPLE_SIZE {
        let start = buf.position();
        let tuple =
            node.add_subtree("VLAN ID tuple", start..start + VLAN_TUPLE_SIZE);
        decode_flags::<VlanTupleFlags>(buf, tuple)?;
        let ect = buf.get_u32()?;
        tuple.add_leaf("ECT-Algorithm", start + 1..start + 5, render_hex(ect));
        let vids = buf.get_u24()?;
        let range = start + 5..buf.position();
        let base_vid = vids >> 12;
        tuple.add_leaf("Base VID", range.clone(), base_vid);
        tuple.add_leaf("SPVID", range, vids & VID_MASK as u32);
        tuple.append_text(format!(": base VID {}", base_vid));
    }

    Ok(())
}

fn decode_spb_opaque_algo(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let algo = buf.get_u32()?;
    node.add_leaf("ECT-Algorithm", start..buf.position(), render_hex(algo));
    if buf.remaining() > 0 {
        let start = buf.position();
        let info = buf.take_rest();
        node.add_leaf("Opaque ECT Information", start..buf.end(), hex(&info));
    }
    Ok(())
}

fn decode_spbm_si(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let bmac = decode_mac(buf, node, "B-MAC")?;
    let start = buf.position();
    let base_vid = buf.get_u16()? & VID_MASK;
    node.add_leaf("Base VID", start..buf.position(), base_vid);
    node.append_text(format!(": {}, base VID {}", bmac, base_vid));

    // Validate the I-SID entries alignment.
    if buf.remaining() % IsidEntry::SIZE != 0 {
        let reason = format!(
            "short I-SID entry ({} bytes)",
            buf.remaining() % IsidEntry::SIZE
        );
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }

    while buf.remaining() >= IsidEntry::SIZE {
        let start = buf.position();
        let entry = IsidEntry::decode(buf)?;
        node.add_leaf("I-SID", start..buf.position(), entry);
    }

    Ok(())
}

fn decode_spbv_mac(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let value = buf.get_u16()?;
    let range = start..buf.position();
    node.add_leaf("SR Bits", range.clone(), (value >> 12) & 0x3);
    node.add_leaf("SPVID", range, value & VID_MASK);

    // Validate the MAC address entries alignment.
    if buf.remaining() % SPBV_MAC_ENTRY_SIZE != 0 {
        let reason = format!(
            "short MAC address entry ({} bytes)",
            buf.remaining() % SPBV_MAC_ENTRY_SIZE
        );
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }

    while buf.remaining() >= SPBV_MAC_ENTRY_SIZE {
        let start = buf.position();
        let flags = IsidFlags::from_bits_truncate(buf.get_u8()?);
        let mac = buf.get_bytes(MAC_ADDR_LEN)?;
        node.add_leaf(
            "MAC Address",
            start..buf.position(),
            format!("{}, flags {}", mac_text(&mac), flags_text(&flags)),
        );
    }

    Ok(())
}

// ===== unit tests =====

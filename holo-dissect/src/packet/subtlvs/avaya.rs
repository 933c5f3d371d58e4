//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

//! Avaya vendor TLVs (184 to 186) found in level 1 LSPs of SPB fabrics.
//!
//! Their layout is not publicly documented. Only the IPVPN TLV is decoded
//! field by field, the multicast ones are kept opaque.

use std::sync::LazyLock as Lazy;

use ipnetwork::ipv4_mask_to_prefix;

use crate::attr::cursor::walk_nested;
use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::AvayaIpvpnStlvType;
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

// Unknown field, system ID, VRF I-SID and sub-TLV byte count.
pub(crate) const IPVPN_MIN_SIZE: u8 = 15;
const IPVPN_SYSTEM_ID_LEN: usize = 7;

// Sub-TLVs of the Avaya IPVPN TLV.
pub static IPVPN_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use AvayaIpvpnStlvType as Stlv;
    AttributeRegistry::new("avaya-ipvpn-stlvs")
        .register(
            Stlv::Ipv4MetricType as u8,
            HandlerDescriptor::new("IPv4 Metric Type", decode_metric_type)
                .with_length(4),
        )
        .register(
            Stlv::Ipv4Reach as u8,
            HandlerDescriptor::new("IPv4 Reachability", decode_ipv4_reach)
                .with_length(12),
        )
        .register(
            Stlv::Ipv6Reach as u8,
            HandlerDescriptor::new("IPv6 Reachability", decode_ipv6_reach)
                .with_length(22),
        )
});

// ===== global functions =====

pub(crate) fn decode_ipvpn(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let unknown = buf.get_bytes(4)?;
    node.add_leaf("Unknown", start..buf.position(), hex(&unknown));
    let start = buf.position();
    let system_id = buf.get_bytes(IPVPN_SYSTEM_ID_LEN)?;
    node.add_leaf("System-ID", start..buf.position(), hex(&system_id));
    let isid = node.add_field("VRF I-SID", buf, BoundedReader::get_u24)?;
    node.append_text(format!(": I-SID {}", isid));
    let stlv_len =
        node.add_field("Sub-TLV Bytes", buf, BoundedReader::get_u8)?;

    // Validate the sub-TLV byte count.
    let expected = IPVPN_MIN_SIZE as usize + stlv_len as usize;
    if rec.length as usize != expected {
        let reason = format!(
            "Inconsistent length {} (should be {})",
            rec.length, expected
        );
        dec.malformed(rec, rec.value.clone(), reason);
        buf.take_rest();
        return Ok(());
    }

    walk_nested(dec, rec, buf, &IPVPN_STLVS, node);
    Ok(())
}

// Multicast TLVs whose content is not known.
pub(crate) fn decode_opaque(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let range = buf.position()..buf.end();
    let data = buf.take_rest();
    node.add_leaf("Unknown", range, hex(&data));
    Ok(())
}

fn decode_metric_type(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let metric_type =
        node.add_field("Metric Type", buf, BoundedReader::get_u32)?;
    node.append_text(format!(": {}", metric_type));
    Ok(())
}

fn decode_ipv4_reach(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("Metric", buf, BoundedReader::get_u32)?;
    let addr = node.add_field("IPv4 Address", buf, BoundedReader::get_ipv4)?;
    let mask = node.add_field("IPv4 Mask", buf, BoundedReader::get_ipv4)?;
    match ipv4_mask_to_prefix(mask) {
        Ok(plen) => node.append_text(format!(": {}/{}", addr, plen)),
        Err(_) => node.append_text(format!(": {} mask {}", addr, mask)),
    }
    Ok(())
}

fn decode_ipv6_reach(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("Metric", buf, BoundedReader::get_u32)?;
    let plen = node.add_field("Prefix length", buf, BoundedReader::get_u16)?;
    let prefix = node.add_field("Prefix", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}/{}", prefix, plen));
    Ok(())
}

// ===== unit tests =====

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
use crate::packet::consts::NeighborStlvType;
use crate::packet::subtlvs::{
    check_sid_flags, decode_msd, decode_sid, decode_u32_list, render_hex,
    srv6,
};
use crate::packet::{
    SystemId, bandwidth_text, decode_bandwidth, decode_flags, flags_text,
};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct AdjSidFlags: u8 {
        const F = 0x80;
        const B = 0x40;
        const V = 0x20;
        const L = 0x10;
        const S = 0x08;
        const P = 0x04;
    }
}

// Standard application identifier bits of the ASLA sub-TLV.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct AslaAppFlags: u8 {
        const R = 0x80;
        const S = 0x40;
        const F = 0x20;
        const X = 0x10;
    }
}

// Anomalous bit of the performance measurement sub-TLVs.
const A_FLAG: u32 = 0x8000_0000;
const PM_VALUE_MASK: u32 = 0x00FF_FFFF;

// Sub-TLVs of the Extended IS Reachability TLVs (22 and 222).
pub static NEIGHBOR_STLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    use NeighborStlvType as Stlv;
    AttributeRegistry::new("neighbor-stlvs")
        .register(
            Stlv::AdminGroup as u8,
            HandlerDescriptor::new(
                "Administrative group(s)",
                decode_admin_group,
            )
            .with_length(4),
        )
        .register(
            Stlv::LinkLocalRemoteIds as u8,
            HandlerDescriptor::new(
                "Link Local/Remote Identifiers",
                decode_link_ids,
            )
            .with_length(8),
        )
        .register(
            Stlv::Ipv4InterfaceAddress as u8,
            HandlerDescriptor::new("IPv4 interface address", decode_ipv4_addr)
                .with_length(4),
        )
        .register(
            Stlv::Ipv4NeighborAddress as u8,
            HandlerDescriptor::new("IPv4 neighbor address", decode_ipv4_addr)
                .with_length(4),
        )
        .register(
            Stlv::MaxLinkBandwidth as u8,
            HandlerDescriptor::new("Maximum link bandwidth", decode_bw)
                .with_length(4),
        )
        .register(
            Stlv::MaxResvLinkBandwidth as u8,
            HandlerDescriptor::new(
                "Maximum reservable link bandwidth",
                decode_bw,
            )
            .with_length(4),
        )
        .register(
            Stlv::UnreservedBandwidth as u8,
            HandlerDescriptor::new("Unreserved bandwidth", decode_unreserved_bw)
                .with_length(32),
        )
        .register(
            Stlv::Ipv6InterfaceAddress as u8,
            HandlerDescriptor::new("IPv6 interface address", decode_ipv6_addr)
                .with_length(16),
        )
        .register(
            Stlv::Ipv6NeighborAddress as u8,
            HandlerDescriptor::new("IPv6 neighbor address", decode_ipv6_addr)
                .with_length(16),
        )
        .register(
            Stlv::ExtAdminGroup as u8,
            HandlerDescriptor::new(
                "Extended Administrative Group",
                decode_ext_admin_group,
            ),
        )
        .register(
            Stlv::LinkMsd as u8,
            HandlerDescriptor::new("Link MSD", decode_msd),
        )
        .register(
            Stlv::AppSpecLinkAttrs as u8,
            HandlerDescriptor::new(
                "Application-Specific Link Attributes",
                decode_asla,
            )
            .with_min_length(2),
        )
        .register(
            Stlv::TeDefaultMetric as u8,
            HandlerDescriptor::new("TE default metric", decode_te_metric)
                .with_length(3),
        )
        .register(
            Stlv::BandwidthConstraints as u8,
            HandlerDescriptor::new(
                "Bandwidth Constraints",
                decode_bw_constraints,
            )
            .with_min_length(4),
        )
        .register(
            Stlv::SpbLinkMetric as u8,
            HandlerDescriptor::new("SPB link metric", decode_spb_metric)
                .with_min_length(6),
        )
        .register(
            Stlv::AdjacencySid as u8,
            HandlerDescriptor::new("Adj-SID", decode_adj_sid)
                .with_min_length(5),
        )
        .register(
            Stlv::LanAdjacencySid as u8,
            HandlerDescriptor::new("LAN-Adj-SID", decode_lan_adj_sid)
                .with_min_length(5),
        )
        .register(
            Stlv::UniLinkDelay as u8,
            HandlerDescriptor::new("Unidirectional Link Delay", decode_delay)
                .with_length(4),
        )
        .register(
            Stlv::MinMaxUniLinkDelay as u8,
            HandlerDescriptor::new(
                "Min/Max Unidirectional Link Delay",
                decode_min_max_delay,
            )
            .with_length(8),
        )
        .register(
            Stlv::UniDelayVariation as u8,
            HandlerDescriptor::new(
                "Unidirectional Delay Variation",
                decode_delay_variation,
            )
            .with_length(4),
        )
        .register(
            Stlv::UniLinkLoss as u8,
            HandlerDescriptor::new("Unidirectional Link Loss", decode_link_loss)
                .with_length(4),
        )
        .register(
            Stlv::UniResidualBandwidth as u8,
            HandlerDescriptor::new(
                "Unidirectional Residual Bandwidth",
                decode_bw,
            )
            .with_length(4),
        )
        .register(
            Stlv::UniAvailableBandwidth as u8,
            HandlerDescriptor::new(
                "Unidirectional Available Bandwidth",
                decode_bw,
            )
            .with_length(4),
        )
        .register(
            Stlv::UniUtilizedBandwidth as u8,
            HandlerDescriptor::new(
                "Unidirectional Utilized Bandwidth",
                decode_bw,
            )
            .with_length(4),
        )
        .register(
            Stlv::Srv6EndXSid as u8,
            HandlerDescriptor::new("SRv6 End.X SID", srv6::decode_end_x_sid)
                .with_min_length(srv6::END_X_SID_MIN_SIZE),
        )
        .register(
            Stlv::Srv6LanEndXSid as u8,
            HandlerDescriptor::new(
                "SRv6 LAN End.X SID",
                srv6::decode_lan_end_x_sid,
            )
            .with_min_length(srv6::END_X_SID_MIN_SIZE),
        )
});

// ===== global functions =====

fn decode_admin_group(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let groups = buf.get_u32()?;
    node.add_leaf("Groups", start..buf.position(), render_hex(groups));
    node.append_text(format!(": {}", render_hex(groups)));
    Ok(())
}

fn decode_link_ids(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let local =
        node.add_field("Link Local Identifier", buf, BoundedReader::get_u32)?;
    let remote =
        node.add_field("Link Remote Identifier", buf, BoundedReader::get_u32)?;
    node.append_text(format!(": {}/{}", local, remote));
    Ok(())
}

fn decode_ipv4_addr(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Address", buf, BoundedReader::get_ipv4)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_ipv6_addr(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Address", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_bw(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let bw = decode_bandwidth(buf, node, "Bandwidth")?;
    node.append_text(format!(": {}", bandwidth_text(bw)));
    Ok(())
}

fn decode_unreserved_bw(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    for priority in 0..8 {
        decode_bandwidth(buf, node, format!("priority level {}", priority))?;
    }
    Ok(())
}

fn decode_ext_admin_group(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_u32_list(dec, rec, buf, node, "Extended Admin Group", render_hex)
}

// Application-Specific Link Attributes: the standard and user-defined
// application bit masks, followed by link attribute sub-TLVs of this same
// registry.
fn decode_asla(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let sabm_len = buf.get_u8()?;
    node.add_leaf(
        "SABM Length",
        start..start + 1,
        format!("{} (L flag {})", sabm_len & 0x7f, sabm_len >> 7),
    );
    let udabm_len = node.add_field("UDABM Length", buf, BoundedReader::get_u8)?;
    let sabm_len = (sabm_len & 0x7f) as usize;
    let udabm_len = (udabm_len & 0x7f) as usize;

    // Validate the bit mask lengths.
    if sabm_len + udabm_len > buf.remaining() {
        let reason = format!(
            "bit masks ({} + {}) exceed the sub-TLV length",
            sabm_len, udabm_len
        );
        dec.malformed(rec, buf.position()..buf.end(), reason);
        return Ok(());
    }

    if sabm_len > 0 {
        let start = buf.position();
        let sabm = buf.get_bytes(sabm_len)?;
        let apps = AslaAppFlags::from_bits_retain(sabm[0]);
        node.add_leaf(
            "Standard Application Identifier Bit Mask",
            start..buf.position(),
            format!("{} {}", hex(&sabm), flags_text(&apps)),
        );
    }
    if udabm_len > 0 {
        let start = buf.position();
        let udabm = buf.get_bytes(udabm_len)?;
        node.add_leaf(
            "User Defined Application Identifier Bit Mask",
            start..buf.position(),
            hex(&udabm),
        );
    }

    walk_nested(dec, rec, buf, &NEIGHBOR_STLVS, node);
    Ok(())
}

fn decode_te_metric(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let metric = node.add_field("Metric", buf, BoundedReader::get_u24)?;
    node.append_text(format!(": {}", metric));
    Ok(())
}

fn decode_bw_constraints(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get = BoundedReader::get_u8;
    node.add_field("Bandwidth Constraints Model Id", buf, get)?;
    buf.skip(3)?;

    if buf.remaining() % 4 != 0 {
        let reason = "bandwidth constraints are not a multiple of 4 bytes";
        dec.malformed(rec, buf.position()..buf.end(), reason);
    }
    let mut idx = 0;
    while buf.remaining() >= 4 {
        decode_bandwidth(buf, node, format!("BC{}", idx))?;
        idx += 1;
    }
    Ok(())
}

fn decode_spb_metric(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let metric =
        node.add_field("SPB link metric", buf, BoundedReader::get_u24)?;
    node.add_field("Number of ports", buf, BoundedReader::get_u8)?;
    node.add_field("Port identifier", buf, BoundedReader::get_u16)?;
    node.append_text(format!(": {}", metric));
    Ok(())
}

fn decode_adj_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let flags = decode_flags::<AdjSidFlags>(buf, node)?;
    node.add_field("Weight", buf, BoundedReader::get_u8)?;
    decode_adj_sid_value(dec, rec, buf, node, flags)
}

fn decode_lan_adj_sid(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let flags = decode_flags::<AdjSidFlags>(buf, node)?;
    node.add_field("Weight", buf, BoundedReader::get_u8)?;
    let start = buf.position();
    let system_id = SystemId::decode(buf, dec.system_id_len())?;
    node.add_leaf("System-ID", start..buf.position(), system_id);
    decode_adj_sid_value(dec, rec, buf, node, flags)
}

fn decode_adj_sid_value(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    flags: AdjSidFlags,
) -> ReadResult<()> {
    check_sid_flags(
        dec,
        rec,
        buf.position()..buf.end(),
        flags.contains(AdjSidFlags::V),
        flags.contains(AdjSidFlags::L),
    );
    decode_sid(dec, rec, buf, node)?;
    Ok(())
}

// Anomalous flag plus a 24-bit value.
fn decode_pm_value(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    label: &str,
) -> ReadResult<(bool, u32)> {
    let start = buf.position();
    let value = buf.get_u32()?;
    let anomalous = value & A_FLAG != 0;
    let value = value & PM_VALUE_MASK;
    node.add_leaf("A flag", start..start + 1, anomalous as u8);
    node.add_leaf(label, start..buf.position(), value);
    Ok((anomalous, value))
}

fn decode_delay(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let (_, delay) = decode_pm_value(buf, node, "Delay (us)")?;
    node.append_text(format!(": {} us", delay));
    Ok(())
}

fn decode_min_max_delay(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let (_, min) = decode_pm_value(buf, node, "Min Delay (us)")?;
    let start = buf.position();
    let max = buf.get_u32()? & PM_VALUE_MASK;
    node.add_leaf("Max Delay (us)", start..buf.position(), max);
    node.append_text(format!(": {}/{} us", min, max));
    Ok(())
}

fn decode_delay_variation(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let variation = buf.get_u32()? & PM_VALUE_MASK;
    node.add_leaf("Delay Variation (us)", start..buf.position(), variation);
    node.append_text(format!(": {} us", variation));
    Ok(())
}

fn decode_link_loss(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let value = buf.get_u32()?;
    let loss = (value & PM_VALUE_MASK) as f64 * 0.000003;
    node.add_leaf("A flag", start..start + 1, (value & A_FLAG != 0) as u8);
    node.add_leaf("Link Loss", start..buf.position(), format!("{:.6} %", loss));
    node.append_text(format!(": {:.6} %", loss));
    Ok(())
}

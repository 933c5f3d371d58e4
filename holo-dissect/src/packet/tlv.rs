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
use ipnetwork::ipv4_mask_to_prefix;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::attr::cursor::walk_nested;
use crate::attr::registry::{AttributeRegistry, HandlerDescriptor};
use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::{AuthenticationType, Nlpid, TlvType};
use crate::packet::subtlvs::capability::ROUTER_CAP_STLVS;
use crate::packet::subtlvs::neighbor::NEIGHBOR_STLVS;
use crate::packet::subtlvs::prefix::PREFIX_STLVS;
use crate::packet::subtlvs::{
    avaya, binding, decode_u32_list, render_decimal, spb, srv6,
};
use crate::packet::{
    AreaAddr, LanId, MAC_ADDR_LEN, SystemId, decode_flags, decode_mac,
    decode_metrics, decode_mt_id, flags_text, mt_id_text,
};
use crate::reader::{BoundedReader, prefix_wire_len};
use crate::tree::{FieldNode, hex};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct Ipv4ReachFlags: u8 {
        const UP_DOWN = 0x80;
        const SUBTLVS = 0x40;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct Ipv6ReachFlags: u8 {
        const UP_DOWN = 0x80;
        const EXTERNAL = 0x40;
        const SUBTLVS = 0x20;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct MtFlags: u16 {
        const OL = 0x8000;
        const ATT = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct RouterCapFlags: u8 {
        const D = 0x02;
        const S = 0x01;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct SrlgFlags: u8 {
        const NUMBERED = 0x01;
    }
}

const IPV4_REACH_PLEN_MASK: u8 = 0x3f;
const IPV4_MAX_PLEN: u8 = 32;
const IPV6_MAX_PLEN: u8 = 128;
const MT_ID_MASK: u16 = 0x0fff;
// Topology/nickname, confidence and VLAN ID.
const MAC_REACH_MIN_SIZE: usize = 5;
const VLAN_ID_MASK: u16 = 0x0fff;

// Top-level TLVs of level 1 LSPs.
pub static LSP_L1_TLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    lsp_tlvs("lsp-l1-tlvs")
        .register(
            TlvType::IsReach as u8,
            HandlerDescriptor::new("IS Reachability", decode_is_reach_l1)
                .with_min_length(1),
        )
        .register(
            TlvType::EsNeighbors as u8,
            HandlerDescriptor::new("ES Neighbor(s)", decode_es_neighbors)
                .with_min_length(4),
        )
        .register(
            TlvType::MacReachability as u8,
            HandlerDescriptor::new("MAC Reachability", decode_mac_reach)
                .with_min_length(MAC_REACH_MIN_SIZE as u8),
        )
        .register(
            TlvType::AvayaIpvpn as u8,
            HandlerDescriptor::new("Avaya IPVPN", avaya::decode_ipvpn)
                .with_min_length(avaya::IPVPN_MIN_SIZE),
        )
        .register(
            TlvType::AvayaIpvpnMcast as u8,
            HandlerDescriptor::new("Avaya IPVPN MCast", avaya::decode_opaque),
        )
        .register(
            TlvType::AvayaIpGrtMcast as u8,
            HandlerDescriptor::new("Avaya IP GRT MCast", avaya::decode_opaque),
        )
});

// Top-level TLVs of level 2 LSPs.
pub static LSP_L2_TLVS: Lazy<AttributeRegistry> = Lazy::new(|| {
    lsp_tlvs("lsp-l2-tlvs")
        .register(
            TlvType::IsReach as u8,
            HandlerDescriptor::new("IS Reachability", decode_is_reach_l2)
                .with_min_length(1),
        )
        .register(
            TlvType::PartitionDis as u8,
            HandlerDescriptor::new(
                "Partition Designated Level 2 IS",
                decode_partition_dis,
            ),
        )
        .register(
            TlvType::PrefixNeighbors as u8,
            HandlerDescriptor::new("Prefix neighbors", decode_prefix_neighbors)
                .with_min_length(4),
        )
});

// ===== global functions =====

// TLVs valid in LSPs of both levels.
fn lsp_tlvs(name: &'static str) -> AttributeRegistry {
    AttributeRegistry::new(name)
        .register(
            TlvType::AreaAddresses as u8,
            HandlerDescriptor::new("Area address(es)", decode_area_addrs),
        )
        .register(
            TlvType::InstanceId as u8,
            HandlerDescriptor::new("Instance Identifier", decode_instance_id)
                .with_min_length(2),
        )
        .register(
            TlvType::Authentication as u8,
            HandlerDescriptor::new("Authentication", decode_authentication)
                .with_min_length(1),
        )
        .register(
            TlvType::PurgeOriginatorId as u8,
            HandlerDescriptor::new(
                "Purge Originator Identification",
                decode_purge_originator,
            )
            .with_min_length(1),
        )
        .register(
            TlvType::LspBufferSize as u8,
            HandlerDescriptor::new("LSP Buffer Size", decode_lsp_buf_size)
                .with_length(2),
        )
        .register(
            TlvType::ExtIsReach as u8,
            HandlerDescriptor::new(
                "Extended IS reachability",
                decode_ext_is_reach,
            ),
        )
        .register(
            TlvType::Srv6Locator as u8,
            HandlerDescriptor::new("SRv6 Locator", srv6::decode_locator)
                .with_min_length(srv6::LOCATOR_MIN_SIZE),
        )
        .register(
            TlvType::Ipv4InternalReach as u8,
            HandlerDescriptor::new(
                "IP Internal reachability",
                decode_ipv4_reach,
            ),
        )
        .register(
            TlvType::ProtocolsSupported as u8,
            HandlerDescriptor::new("Protocols supported", decode_protocols),
        )
        .register(
            TlvType::Ipv4ExternalReach as u8,
            HandlerDescriptor::new(
                "IP External reachability",
                decode_ipv4_reach,
            ),
        )
        .register(
            TlvType::Ipv4Addresses as u8,
            HandlerDescriptor::new(
                "IP Interface address(es)",
                decode_ipv4_addrs,
            ),
        )
        .register(
            TlvType::IpAuthentication as u8,
            HandlerDescriptor::new("IP Authentication", decode_ip_auth),
        )
        .register(
            TlvType::Ipv4RouterId as u8,
            HandlerDescriptor::new(
                "Traffic Engineering Router ID",
                decode_ipv4_router_id,
            )
            .with_length(4),
        )
        .register(
            TlvType::ExtIpv4Reach as u8,
            HandlerDescriptor::new(
                "Extended IP reachability",
                decode_ext_ipv4_reach,
            ),
        )
        .register(
            TlvType::DynamicHostname as u8,
            HandlerDescriptor::new("Hostname", decode_hostname),
        )
        .register(
            TlvType::SharedRiskLinkGroup as u8,
            HandlerDescriptor::new("Shared Risk Link Group", decode_srlg),
        )
        .register(
            TlvType::Ipv6RouterId as u8,
            HandlerDescriptor::new("IPv6 TE Router ID", decode_ipv6_router_id)
                .with_length(16),
        )
        .register(
            TlvType::MtCapability as u8,
            HandlerDescriptor::new("MT-Capability", spb::decode_mt_cap)
                .with_min_length(2),
        )
        .register(
            TlvType::SidLabelBinding as u8,
            HandlerDescriptor::new("SID/Label Binding", binding::decode_binding)
                .with_min_length(binding::BINDING_MIN_SIZE),
        )
        .register(
            TlvType::MtSidLabelBinding as u8,
            HandlerDescriptor::new(
                "Multi-Topology SID/Label Binding",
                binding::decode_mt_binding,
            )
            .with_min_length(binding::BINDING_MIN_SIZE + 2),
        )
        .register(
            TlvType::MtIsReach as u8,
            HandlerDescriptor::new("MT IS Reachability", decode_mt_is_reach)
                .with_min_length(2),
        )
        .register(
            TlvType::MultiTopology as u8,
            HandlerDescriptor::new("Multi Topology", decode_multi_topology),
        )
        .register(
            TlvType::Ipv6Addresses as u8,
            HandlerDescriptor::new(
                "IPv6 Interface address(es)",
                decode_ipv6_addrs,
            ),
        )
        .register(
            TlvType::MtIpv4Reach as u8,
            HandlerDescriptor::new(
                "Multi Topology IPv4 Reachability",
                decode_mt_ipv4_reach,
            )
            .with_min_length(2),
        )
        .register(
            TlvType::Ipv6Reach as u8,
            HandlerDescriptor::new("IPv6 reachability", decode_ipv6_reach),
        )
        .register(
            TlvType::MtIpv6Reach as u8,
            HandlerDescriptor::new(
                "Multi Topology IPv6 reachability",
                decode_mt_ipv6_reach,
            )
            .with_min_length(2),
        )
        .register(
            TlvType::RouterCapability as u8,
            HandlerDescriptor::new("Router Capability", decode_router_cap)
                .with_min_length(5),
        )
}

// Splits off the next entry of a TLV holding a list of entries.
//
// An entry that doesn't fit is reported and the rest of the TLV is skipped.
fn split_entry(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    len: usize,
) -> ReadResult<Option<BoundedReader>> {
    if len > buf.remaining() {
        let reason = format!(
            "entry of {} bytes exceeds the remaining {} bytes",
            len,
            buf.remaining()
        );
        dec.malformed(rec, buf.position()..buf.end(), reason);
        buf.take_rest();
        return Ok(None);
    }
    buf.split_to(len).map(Some)
}

fn decode_area_addrs(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    while buf.remaining() > 0 {
        let start = buf.position();
        let addr_len = buf.get_u8()? as usize;
        if addr_len > buf.remaining() {
            let reason =
                format!("area address length {} exceeds the TLV", addr_len);
            dec.malformed(rec, start..buf.end(), reason);
            buf.take_rest();
            break;
        }
        let addr = AreaAddr::decode(buf, addr_len)?;
        node.add_leaf(
            format!("Area address ({})", addr_len),
            start..buf.position(),
            addr,
        );
    }
    Ok(())
}

fn decode_is_reach_l1(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("IsVirtual", buf, BoundedReader::get_u8)?;
    decode_is_neighbors(dec, rec, buf, node)
}

// The virtual flag is only meaningful in level 1 LSPs.
fn decode_is_reach_l2(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    node.add_field("Reserved", buf, BoundedReader::get_u8)?;
    decode_is_neighbors(dec, rec, buf, node)
}

fn decode_is_neighbors(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let entry_len = 4 + dec.system_id_len() + 1;
    while buf.remaining() > 0 {
        let Some(mut entry_buf) = split_entry(dec, rec, buf, entry_len)? else {
            break;
        };
        let entry = node.add_subtree("IS Neighbor", entry_buf.range());
        decode_metrics(dec, rec, &mut entry_buf, entry, false)?;
        let start = entry_buf.position();
        let neighbor = LanId::decode(&mut entry_buf, dec.system_id_len())?;
        entry.append_text(format!(": {}", neighbor));
        entry.add_leaf("IS Neighbor", start..entry_buf.position(), neighbor);
    }
    Ok(())
}

fn decode_es_neighbors(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_metrics(dec, rec, buf, node, false)?;
    let id_len = dec.system_id_len();
    while buf.remaining() > 0 {
        let Some(mut entry_buf) = split_entry(dec, rec, buf, id_len)? else {
            break;
        };
        let id = SystemId::decode(&mut entry_buf, id_len)?;
        node.add_leaf("ES Neighbor ID", entry_buf.range(), id);
    }
    Ok(())
}

fn decode_partition_dis(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let id_len = dec.system_id_len();

    // Validate the TLV length.
    if rec.length as usize != id_len {
        let reason =
            format!("Invalid length {} (should be {})", rec.length, id_len);
        dec.malformed(rec, rec.value.clone(), reason);
        if (rec.length as usize) < id_len {
            return Ok(());
        }
    }

    let start = buf.position();
    let system_id = SystemId::decode(buf, id_len)?;
    node.append_text(format!(": {}", system_id));
    node.add_leaf(
        "Partition designated L2 IS",
        start..buf.position(),
        system_id,
    );
    Ok(())
}

fn decode_prefix_neighbors(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    decode_metrics(dec, rec, buf, node, false)?;
    while buf.remaining() > 0 {
        let start = buf.position();

        // The prefix length is given in semi-octets.
        let nibbles = buf.get_u8()? as usize;
        let len = nibbles.div_ceil(2);
        if len > buf.remaining() {
            let reason = format!("prefix length {} exceeds the TLV", nibbles);
            dec.malformed(rec, start..buf.end(), reason);
            buf.take_rest();
            break;
        }
        let prefix = buf.get_bytes(len)?;
        let mut text = hex(&prefix);
        text.truncate(nibbles);
        node.add_leaf("Area address prefix", start..buf.position(), text);
    }
    Ok(())
}

fn decode_instance_id(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length % 2 != 0 {
        dec.malformed(rec, rec.value.clone(), "odd instance identifier length");
    }
    let iid =
        node.add_field("Instance Identifier", buf, BoundedReader::get_u16)?;
    node.append_text(format!(": {}", iid));
    while buf.remaining() >= 2 {
        node.add_field("Topology Identifier", buf, BoundedReader::get_u16)?;
    }
    Ok(())
}

fn decode_authentication(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let auth_type = buf.get_u8()?;
    let auth_type = AuthenticationType::from_u8(auth_type).ok_or(auth_type);
    let text = match auth_type {
        Ok(auth_type) => auth_type.to_string(),
        Err(auth_type) => format!("unknown ({})", auth_type),
    };
    node.add_leaf("Authentication type", start..buf.position(), &text);
    node.append_text(format!(": {}", text));

    match auth_type {
        Ok(AuthenticationType::ClearText) => {
            let start = buf.position();
            let passwd = buf.take_rest();
            let passwd = String::from_utf8_lossy(&passwd);
            node.add_leaf("Password", start..buf.position(), passwd);
        }
        Ok(AuthenticationType::HmacMd5) => {
            let start = buf.position();
            let digest = buf.take_rest();
            node.add_leaf("Digest", start..buf.position(), hex(&digest));
        }
        Ok(AuthenticationType::Cryptographic) => {
            node.add_field("Key ID", buf, BoundedReader::get_u16)?;
            let start = buf.position();
            let digest = buf.take_rest();
            node.add_leaf("Digest", start..buf.position(), hex(&digest));
        }
        Err(_) => {
            let start = buf.position();
            let data = buf.take_rest();
            node.add_leaf(
                "Authentication data",
                start..buf.position(),
                hex(&data),
            );
        }
    }
    Ok(())
}

fn decode_purge_originator(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let id_len = dec.system_id_len();
    let start = buf.position();
    let count = buf.get_u8()?;
    node.add_leaf("Number of System IDs", start..buf.position(), count);

    // Validate the number of System IDs.
    if count != 1 && count != 2 {
        let reason = format!("invalid number of System IDs {}", count);
        dec.malformed(rec, start..buf.position(), reason);
        return Ok(());
    }
    if rec.length as usize != 1 + count as usize * id_len {
        let reason = format!(
            "Invalid length {} (should be {})",
            rec.length,
            1 + count as usize * id_len
        );
        dec.malformed(rec, rec.value.clone(), reason);
    }

    let labels = [
        "System ID of originating IS",
        "System ID of IS from which received",
    ];
    for label in labels.into_iter().take(count as usize) {
        let start = buf.position();
        let system_id = SystemId::decode(buf, id_len)?;
        node.add_leaf(label, start..buf.position(), system_id);
    }
    Ok(())
}

fn decode_lsp_buf_size(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let size = node.add_field("LSP Buffer Size", buf, BoundedReader::get_u16)?;
    node.append_text(format!(": {}", size));
    Ok(())
}

fn decode_ext_is_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get_u8 = BoundedReader::get_u8;
    let id_len = dec.system_id_len();
    while buf.remaining() > 0 {
        // Neighbor ID, metric and sub-TLV length.
        let fixed_len = id_len + 1 + 3 + 1;
        let stlv_len = match buf.remaining() >= fixed_len {
            true => buf.read_u8(buf.position() + fixed_len - 1)? as usize,
            false => 0,
        };
        let Some(mut entry_buf) =
            split_entry(dec, rec, buf, fixed_len + stlv_len)?
        else {
            break;
        };

        let entry = node.add_subtree("IS Neighbor", entry_buf.range());
        let start = entry_buf.position();
        let neighbor = LanId::decode(&mut entry_buf, id_len)?;
        entry.add_leaf("IS Neighbor", start..entry_buf.position(), &neighbor);
        entry.append_text(format!(": {}", neighbor));
        entry.add_field("Metric", &mut entry_buf, BoundedReader::get_u24)?;
        entry.add_field("SubCLV Length", &mut entry_buf, get_u8)?;
        walk_nested(dec, rec, &mut entry_buf, &NEIGHBOR_STLVS, entry);
    }
    Ok(())
}

fn decode_mt_is_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let mt_id = decode_mt_id(buf, node)?;
    node.append_text(format!(": {}", mt_id_text(mt_id)));
    decode_ext_is_reach(dec, rec, buf, node)
}

// Narrow IP reachability: fixed 12-byte entries with an address and mask.
fn decode_ipv4_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    while buf.remaining() > 0 {
        let Some(mut entry_buf) = split_entry(dec, rec, buf, 12)? else {
            break;
        };
        let entry = node.add_subtree("IPv4 prefix", entry_buf.range());
        decode_metrics(dec, rec, &mut entry_buf, entry, true)?;
        let start = entry_buf.position();
        let addr = entry_buf.get_ipv4()?;
        let mask = entry_buf.get_ipv4()?;

        // Non-contiguous masks can't be shown as a prefix length.
        let prefix = match ipv4_mask_to_prefix(mask) {
            Ok(plen) => format!("{}/{}", addr, plen),
            Err(_) => format!("{} mask {}", addr, mask),
        };
        entry.add_leaf("IPv4 prefix", start..entry_buf.position(), &prefix);
        entry.append_text(format!(": {}", prefix));
    }
    Ok(())
}

fn decode_protocols(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    while buf.remaining() > 0 {
        let start = buf.position();
        let nlpid = buf.get_u8()?;
        let text = match Nlpid::from_u8(nlpid) {
            Some(proto) => format!("0x{:02x} ({})", nlpid, proto),
            None => format!("0x{:02x}", nlpid),
        };
        node.add_leaf("NLPID", start..buf.position(), text);
    }
    Ok(())
}

fn decode_ipv4_addrs(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length % 4 != 0 {
        dec.malformed(rec, rec.value.clone(), "not a multiple of 4 bytes");
    }
    while buf.remaining() >= 4 {
        node.add_field("IPv4 interface address", buf, BoundedReader::get_ipv4)?;
    }
    Ok(())
}

fn decode_ipv6_addrs(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length % 16 != 0 {
        dec.malformed(rec, rec.value.clone(), "not a multiple of 16 bytes");
    }
    while buf.remaining() >= 16 {
        node.add_field("IPv6 interface address", buf, BoundedReader::get_ipv6)?;
    }
    Ok(())
}

fn decode_ip_auth(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let data = buf.take_rest();
    let text = String::from_utf8_lossy(&data);
    node.add_leaf("IP Authentication", start..buf.position(), text);
    Ok(())
}

fn decode_ipv4_router_id(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Router ID", buf, BoundedReader::get_ipv4)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_ipv6_router_id(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let addr = node.add_field("Router ID", buf, BoundedReader::get_ipv6)?;
    node.append_text(format!(": {}", addr));
    Ok(())
}

fn decode_ext_ipv4_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get_u8 = BoundedReader::get_u8;
    while buf.remaining() > 0 {
        // Metric and control byte.
        let start = buf.position();
        let len = match buf.remaining() >= 5 {
            true => {
                let control = buf.read_u8(start + 4)?;
                let flags = Ipv4ReachFlags::from_bits_truncate(control);
                let plen = control & IPV4_REACH_PLEN_MASK;
                if plen > IPV4_MAX_PLEN {
                    let reason = format!("invalid prefix length {}", plen);
                    dec.malformed(rec, start + 4..start + 5, reason);
                    buf.take_rest();
                    break;
                }
                let len = 5 + prefix_wire_len(plen);
                if flags.contains(Ipv4ReachFlags::SUBTLVS)
                    && buf.remaining() > len
                {
                    len + 1 + buf.read_u8(start + len)? as usize
                } else if flags.contains(Ipv4ReachFlags::SUBTLVS) {
                    len + 1
                } else {
                    len
                }
            }
            false => 5,
        };
        let Some(mut entry_buf) = split_entry(dec, rec, buf, len)? else {
            break;
        };

        let entry = node.add_subtree("IPv4 prefix", entry_buf.range());
        entry.add_field("Metric", &mut entry_buf, BoundedReader::get_u32)?;
        let start = entry_buf.position();
        let control = entry_buf.get_u8()?;
        let flags = Ipv4ReachFlags::from_bits_truncate(control);
        let plen = control & IPV4_REACH_PLEN_MASK;
        entry.add_leaf("Flags", start..start + 1, flags_text(&flags));
        let start = entry_buf.position();
        let prefix = entry_buf.get_ipv4_prefix(plen)?;
        entry.add_leaf(
            "IPv4 prefix",
            start..entry_buf.position(),
            format!("{}/{}", prefix, plen),
        );
        entry.append_text(format!(": {}/{}", prefix, plen));
        if flags.contains(Ipv4ReachFlags::SUBTLVS) {
            entry.add_field("SubCLV Length", &mut entry_buf, get_u8)?;
            walk_nested(dec, rec, &mut entry_buf, &PREFIX_STLVS, entry);
        }
    }
    Ok(())
}

fn decode_mt_ipv4_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let mt_id = decode_mt_id(buf, node)?;
    node.append_text(format!(": {}", mt_id_text(mt_id)));
    decode_ext_ipv4_reach(dec, rec, buf, node)
}

fn decode_ipv6_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let get_u8 = BoundedReader::get_u8;
    while buf.remaining() > 0 {
        // Metric, flags and prefix length.
        let start = buf.position();
        let len = match buf.remaining() >= 6 {
            true => {
                let flags = buf.read_u8(start + 4)?;
                let flags = Ipv6ReachFlags::from_bits_truncate(flags);
                let plen = buf.read_u8(start + 5)?;
                if plen > IPV6_MAX_PLEN {
                    let reason = format!("invalid prefix length {}", plen);
                    dec.malformed(rec, start + 5..start + 6, reason);
                    buf.take_rest();
                    break;
                }
                let len = 6 + prefix_wire_len(plen);
                if flags.contains(Ipv6ReachFlags::SUBTLVS)
                    && buf.remaining() > len
                {
                    len + 1 + buf.read_u8(start + len)? as usize
                } else if flags.contains(Ipv6ReachFlags::SUBTLVS) {
                    len + 1
                } else {
                    len
                }
            }
            false => 6,
        };
        let Some(mut entry_buf) = split_entry(dec, rec, buf, len)? else {
            break;
        };

        let entry = node.add_subtree("IPv6 prefix", entry_buf.range());
        entry.add_field("Metric", &mut entry_buf, BoundedReader::get_u32)?;
        let flags = decode_flags::<Ipv6ReachFlags>(&mut entry_buf, entry)?;
        let plen =
            entry.add_field("Prefix Length", &mut entry_buf, get_u8)?;
        let start = entry_buf.position();
        let prefix = entry_buf.get_ipv6_prefix(plen)?;
        entry.add_leaf(
            "IPv6 prefix",
            start..entry_buf.position(),
            format!("{}/{}", prefix, plen),
        );
        entry.append_text(format!(": {}/{}", prefix, plen));
        if flags.contains(Ipv6ReachFlags::SUBTLVS) {
            entry.add_field("SubCLV Length", &mut entry_buf, get_u8)?;
            walk_nested(dec, rec, &mut entry_buf, &PREFIX_STLVS, entry);
        }
    }
    Ok(())
}

fn decode_mt_ipv6_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let mt_id = decode_mt_id(buf, node)?;
    node.append_text(format!(": {}", mt_id_text(mt_id)));
    decode_ipv6_reach(dec, rec, buf, node)
}

fn decode_hostname(
    _dec: &mut Decoder,
    _rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let start = buf.position();
    let hostname = buf.take_rest();
    let hostname = String::from_utf8_lossy(&hostname);
    node.append_text(format!(": {}", hostname));
    node.add_leaf("Hostname", start..buf.position(), hostname);
    Ok(())
}

fn decode_srlg(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let id_len = dec.system_id_len();

    // System ID, pseudonode, flags and both IPv4 addresses.
    let min_len = id_len + 1 + 1 + 4 + 4;
    if (rec.length as usize) < min_len {
        let reason =
            format!("Too short length {} (min {})", rec.length, min_len);
        dec.malformed(rec, rec.value.clone(), reason);
        return Ok(());
    }

    let start = buf.position();
    let neighbor = LanId::decode(buf, id_len)?;
    node.add_leaf("Neighbor", start..buf.position(), &neighbor);
    node.append_text(format!(": {}", neighbor));
    decode_flags::<SrlgFlags>(buf, node)?;
    node.add_field("IPv4 interface address", buf, BoundedReader::get_ipv4)?;
    node.add_field("IPv4 neighbor address", buf, BoundedReader::get_ipv4)?;
    decode_u32_list(dec, rec, buf, node, "SRLG", render_decimal)
}

// MAC Reachability: topology or nickname, confidence and VLAN, followed by
// the reachable MAC addresses.
fn decode_mac_reach(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // Validate the TLV length.
    if buf.remaining() < MAC_REACH_MIN_SIZE {
        return Ok(());
    }
    if (buf.remaining() - MAC_REACH_MIN_SIZE) % MAC_ADDR_LEN != 0 {
        let reason = format!(
            "Unexpected length {} (should be 5 + N*6)",
            rec.length
        );
        dec.malformed(rec, rec.value.clone(), reason);
    }

    let start = buf.position();
    let topo_nick = buf.get_u16()?;
    node.add_leaf(
        "Topology-id/Nickname",
        start..buf.position(),
        format!("0x{:04x}", topo_nick),
    );
    node.add_field("Confidence", buf, BoundedReader::get_u8)?;
    let start = buf.position();
    let vlan_id = buf.get_u16()? & VLAN_ID_MASK;
    node.add_leaf("VLAN-ID", start..buf.position(), vlan_id);
    node.append_text(format!(": VLAN {}", vlan_id));

    while buf.remaining() >= MAC_ADDR_LEN {
        decode_mac(buf, node, "MAC Address")?;
    }
    Ok(())
}

fn decode_multi_topology(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    if rec.length % 2 != 0 {
        dec.malformed(rec, rec.value.clone(), "odd multi topology length");
    }
    while buf.remaining() >= 2 {
        let start = buf.position();
        let value = buf.get_u16()?;
        let flags = MtFlags::from_bits_truncate(value);
        let text = format!(
            "{}, flags {}",
            mt_id_text(value & MT_ID_MASK),
            flags_text(&flags)
        );
        node.add_leaf("Topology", start..buf.position(), text);
    }
    Ok(())
}

fn decode_router_cap(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<()> {
    let router_id = node.add_field("Router ID", buf, BoundedReader::get_ipv4)?;
    node.append_text(format!(": {}", router_id));
    decode_flags::<RouterCapFlags>(buf, node)?;
    walk_nested(dec, rec, buf, &ROUTER_CAP_STLVS, node);
    Ok(())
}

// ===== unit tests =====

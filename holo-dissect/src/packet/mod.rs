//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod consts;
pub mod pdu;
pub mod subtlvs;
pub mod tlv;

use bitflags::{Flags, bitflags};
use itertools::Itertools;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::packet::consts::{IgpAlgoType, MtId};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

// Represents an IS-IS Area Address.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct AreaAddr(SmallVec<[u8; 13]>);

// Represents an IS-IS System ID. Its length is set by the caller.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct SystemId(SmallVec<[u8; 8]>);

// Represents an IS-IS LAN ID.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LanId {
    pub system_id: SystemId,
    pub pseudonode: u8,
}

// Represents an IS-IS LSP ID.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LspId {
    pub system_id: SystemId,
    pub pseudonode: u8,
    pub fragment: u8,
}

// Default, delay, expense and error metric byte.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct MetricFlags: u8 {
        const S = 0x80;
        const R = 0x40;
    }
}

pub(crate) const MAC_ADDR_LEN: usize = 6;

// ===== impl AreaAddr =====

impl AreaAddr {
    pub(crate) fn decode(
        buf: &mut BoundedReader,
        len: usize,
    ) -> ReadResult<Self> {
        let bytes = buf.get_bytes(len)?;
        Ok(AreaAddr(bytes.iter().copied().collect()))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for AreaAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The AFI goes first, followed by groups of two bytes.
        let Some((afi, rest)) = self.0.split_first() else {
            return Ok(());
        };
        write!(f, "{:02x}", afi)?;
        for chunk in rest.chunks(2) {
            write!(f, ".")?;
            for byte in chunk {
                write!(f, "{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

// ===== impl SystemId =====

impl SystemId {
    pub(crate) fn decode(
        buf: &mut BoundedReader,
        id_len: usize,
    ) -> ReadResult<Self> {
        let bytes = buf.get_bytes(id_len)?;
        Ok(SystemId(bytes.iter().copied().collect()))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.chunks(2).map(hex).join("."))
    }
}

// ===== impl LanId =====

impl LanId {
    pub(crate) fn decode(
        buf: &mut BoundedReader,
        id_len: usize,
    ) -> ReadResult<Self> {
        let system_id = SystemId::decode(buf, id_len)?;
        let pseudonode = buf.get_u8()?;
        Ok(LanId {
            system_id,
            pseudonode,
        })
    }
}

impl std::fmt::Display for LanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02x}", self.system_id, self.pseudonode)
    }
}

// ===== impl LspId =====

impl LspId {
    pub(crate) fn decode(
        buf: &mut BoundedReader,
        id_len: usize,
    ) -> ReadResult<Self> {
        let system_id = SystemId::decode(buf, id_len)?;
        let pseudonode = buf.get_u8()?;
        let fragment = buf.get_u8()?;
        Ok(LspId {
            system_id,
            pseudonode,
            fragment,
        })
    }
}

impl std::fmt::Display for LspId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02x}-{:02x}",
            self.system_id, self.pseudonode, self.fragment
        )
    }
}

// ===== global functions =====

// Decodes the four metric bytes shared by the narrow reachability TLVs.
//
// In IP reachability entries, bit 0x40 of the default metric carries the
// internal/external distribution instead of being reserved.
pub(crate) fn decode_metrics(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    ip_reach: bool,
) -> ReadResult<u8> {
    let labels = [
        "Default metric",
        "Delay metric",
        "Expense metric",
        "Error metric",
    ];
    let mut default = 0;
    for (idx, label) in labels.into_iter().enumerate() {
        let start = buf.position();
        let metric = buf.get_u8()?;
        let range = start..buf.position();
        let flags = MetricFlags::from_bits_truncate(metric);
        let value = metric & !MetricFlags::all().bits();

        let mut text = value.to_string();
        if flags.contains(MetricFlags::S) {
            text.push_str(", not supported");
            // The default metric can't be left out.
            if idx == 0 {
                text.push_str(" (but is required to be)");
            }
        }
        if flags.contains(MetricFlags::R) {
            if idx == 0 && ip_reach {
                text.push_str(", external");
            } else {
                let reason = format!("{} reserved bit set", label);
                dec.malformed(rec, range.clone(), reason);
            }
        } else if idx == 0 && ip_reach {
            text.push_str(", internal");
        }
        node.add_leaf(label, range, text);

        if idx == 0 {
            default = value;
        }
    }

    Ok(default)
}

// Decodes a Multi-Topology ID, masking the flag bits carried alongside it.
pub(crate) fn decode_mt_id(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<u16> {
    let start = buf.position();
    let mt_id = buf.get_u16()? & 0x0fff;
    node.add_leaf("Topology ID", start..buf.position(), mt_id_text(mt_id));
    Ok(mt_id)
}

pub(crate) fn mt_id_text(mt_id: u16) -> String {
    match MtId::from_u16(mt_id) {
        Some(name) => format!("{} ({})", mt_id, name),
        None => mt_id.to_string(),
    }
}

pub(crate) fn algo_text(algo: u8) -> String {
    match IgpAlgoType::from_u8(algo) {
        Some(name) => format!("{} ({})", algo, name),
        None if algo >= 128 => format!("{} (Flexible Algorithm)", algo),
        None => format!("{} (Unassigned)", algo),
    }
}

// Bandwidth is carried in bytes per second.
pub(crate) fn bandwidth_text(bw: f32) -> String {
    format!("{:.2} Mbps", bw as f64 * 8.0 / 1_000_000.0)
}

// Reads a bandwidth float and records it as a leaf.
pub(crate) fn decode_bandwidth(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    label: impl Into<String>,
) -> ReadResult<f32> {
    let start = buf.position();
    let bw = buf.get_f32()?;
    node.add_leaf(label, start..buf.position(), bandwidth_text(bw));
    Ok(bw)
}

pub(crate) fn mac_text(mac: &[u8]) -> String {
    mac.iter().map(|byte| format!("{:02x}", byte)).join(":")
}

// Reads a 6-byte MAC address and records it as a leaf.
pub(crate) fn decode_mac(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
    label: impl Into<String>,
) -> ReadResult<String> {
    let start = buf.position();
    let mac = mac_text(&buf.get_bytes(MAC_ADDR_LEN)?);
    node.add_leaf(label, start..buf.position(), &mac);
    Ok(mac)
}

// Renders a flags byte along with the names of the bits that are set.
pub(crate) fn flags_text<F>(flags: &F) -> String
where
    F: Flags,
    F::Bits: std::fmt::LowerHex,
{
    let names = flags.iter_names().map(|(name, _)| name).join(", ");
    if names.is_empty() {
        format!("0x{:02x}", flags.bits())
    } else {
        format!("0x{:02x} ({})", flags.bits(), names)
    }
}

// Reads a flags byte and records it as a leaf.
pub(crate) fn decode_flags<F>(
    buf: &mut BoundedReader,
    node: &mut FieldNode,
) -> ReadResult<F>
where
    F: Flags<Bits = u8>,
{
    let start = buf.position();
    let flags = F::from_bits_retain(buf.get_u8()?);
    node.add_leaf("Flags", start..buf.position(), flags_text(&flags));
    Ok(flags)
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::ops::Range;

use bitflags::bitflags;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::attr::Decoder;
use crate::attr::cursor::walk;
use crate::attr::registry::AttributeRegistry;
use crate::config::DecodeConfig;
use crate::debug::Debug;
use crate::error::{DiagnosticKind, ReadError, ReadResult};
use crate::packet::consts::{
    IDRP_DISCRIMINATOR, MAX_SYSTEM_ID_LEN, PduType, SYSTEM_ID_LEN, VERSION,
    VERSION_PROTO_EXT,
};
use crate::packet::tlv::{LSP_L1_TLVS, LSP_L2_TLVS};
use crate::packet::{LspId, flags_text};
use crate::reader::BoundedReader;
use crate::tree::{DecodeOutput, FieldNode};

// Kind of LSP being decoded, which selects the set of valid top-level TLVs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum PduKind {
    L1,
    L2,
}

// Outcome of the LSP checksum verification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum ChecksumStatus {
    NotPresent,
    Unverified,
    Correct,
    Incorrect,
}

// LSP type block.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LspFlags: u8 {
        const P = 0x80;
        const ATT_ERROR = 0x40;
        const ATT_EXPENSE = 0x20;
        const ATT_DELAY = 0x10;
        const ATT_DEFAULT = 0x08;
        const OL = 0x04;
        const IS_TYPE2 = 0x02;
        const IS_TYPE1 = 0x01;
    }
}

pub const COMMON_HDR_LEN: usize = 8;
// PDU length, remaining lifetime, pseudonode, fragment, sequence number,
// checksum and type block.
const LSP_HDR_FIXED_LEN: usize = 2 + 2 + 1 + 1 + 4 + 2 + 1;
// Offset of the LSP ID, where checksummed data starts.
const LSP_ID_OFFSET: usize = COMMON_HDR_LEN + 4;
const PDU_TYPE_MASK: u8 = 0x1f;
const ID_LEN_ZERO: u8 = 255;
const DFLT_MAX_AREA_ADDRS: u8 = 3;

// ===== impl PduKind =====

impl PduKind {
    pub fn from_level(level: u8) -> Option<PduKind> {
        match level {
            1 => Some(PduKind::L1),
            2 => Some(PduKind::L2),
            _ => None,
        }
    }

    pub fn pdu_type(&self) -> PduType {
        match self {
            PduKind::L1 => PduType::LspL1,
            PduKind::L2 => PduType::LspL2,
        }
    }

    // Returns the registry of top-level TLVs.
    pub fn registry(&self) -> &'static AttributeRegistry {
        match self {
            PduKind::L1 => &LSP_L1_TLVS,
            PduKind::L2 => &LSP_L2_TLVS,
        }
    }
}

impl std::fmt::Display for PduKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pdu_type())
    }
}

// ===== impl ChecksumStatus =====

impl std::fmt::Display for ChecksumStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumStatus::NotPresent => write!(f, "not present"),
            ChecksumStatus::Unverified => write!(f, "unverified"),
            ChecksumStatus::Correct => write!(f, "correct"),
            ChecksumStatus::Incorrect => write!(f, "incorrect"),
        }
    }
}

// ===== global functions =====

/// Decodes an IS-IS LSP using the default configuration.
///
/// See [`decode_pdu_with_config`].
pub fn decode_pdu(
    buf: BoundedReader,
    kind: PduKind,
    system_id_len: u8,
) -> DecodeOutput {
    decode_pdu_with_config(buf, kind, system_id_len, &DecodeConfig::default())
}

/// Decodes an IS-IS LSP into a tree of labeled fields.
///
/// `buf` holds the captured frame, starting at the IRPD. The System ID
/// length governs the layout of every ID in the PDU; the ID length carried
/// in the common header is only sanity-checked against it.
///
/// Decoding never fails. Every problem found along the way is reported as a
/// diagnostic attached to the offending byte range, and decoding carries on
/// with whatever can still be made sense of.
pub fn decode_pdu_with_config(
    mut buf: BoundedReader,
    kind: PduKind,
    system_id_len: u8,
    config: &DecodeConfig,
) -> DecodeOutput {
    let span = debug_span!("pdu", %kind);
    let _span_guard = span.enter();
    Debug::PduDecodeStart(kind, buf.captured_len(), system_id_len as usize)
        .log();

    let mut dec = Decoder::new(config.max_depth, system_id_len);
    let mut root = FieldNode::new(format!("ISIS {}", kind), buf.range());
    if let Err(error) = decode_lsp(&mut dec, &mut buf, kind, config, &mut root)
    {
        let ReadError::OutOfBounds { offset, length, .. } = error;
        let kind = DiagnosticKind::OutOfBounds { offset, length };
        dec.report(kind, offset..offset.saturating_add(length));
    }

    let output = DecodeOutput {
        root,
        diagnostics: dec.into_diagnostics(),
    };
    Debug::PduDecodeEnd(kind, &output).log();
    output
}

fn decode_lsp(
    dec: &mut Decoder,
    buf: &mut BoundedReader,
    kind: PduKind,
    config: &DecodeConfig,
    root: &mut FieldNode,
) -> ReadResult<()> {
    let captured = buf.captured_len();
    let hdr_len = COMMON_HDR_LEN + LSP_HDR_FIXED_LEN + dec.system_id_len();

    // Ensure the packet has enough data for the common header.
    if buf.captured_remaining() < COMMON_HDR_LEN {
        let kind = DiagnosticKind::Truncated {
            offset: buf.position(),
            needed: COMMON_HDR_LEN,
            available: captured,
        };
        dec.report(kind, 0..COMMON_HDR_LEN);
        return Ok(());
    }
    let node = root.add_subtree("Common header", 0..COMMON_HDR_LEN);
    decode_common_header(dec, buf, kind, hdr_len, node)?;

    // Ensure the packet has enough data for the LSP header.
    if captured < hdr_len {
        let kind = DiagnosticKind::Truncated {
            offset: COMMON_HDR_LEN,
            needed: hdr_len,
            available: captured,
        };
        dec.report(kind, COMMON_HDR_LEN..hdr_len);
        return Ok(());
    }
    let node = root.add_subtree("LSP header", COMMON_HDR_LEN..hdr_len);
    let Some(pdu_len) = decode_lsp_header(dec, buf, hdr_len, config, node)?
    else {
        return Ok(());
    };
    root.range = 0..std::cmp::max(captured, pdu_len);

    // Parse top-level TLVs. Anything captured past the PDU length is padding.
    let mut body = buf.claim(pdu_len - hdr_len);
    walk(dec, &mut body, kind.registry(), root);

    Ok(())
}

fn decode_common_header(
    dec: &mut Decoder,
    buf: &mut BoundedReader,
    kind: PduKind,
    hdr_len: usize,
    node: &mut FieldNode,
) -> ReadResult<()> {
    // Parse IDRP discriminator.
    let (idrp_discr, range) = get_u8(buf)?;
    node.add_leaf(
        "Intradomain Routing Protocol Discriminator",
        range.clone(),
        format!("0x{:02x}", idrp_discr),
    );
    if idrp_discr != IDRP_DISCRIMINATOR {
        let reason = format!("invalid IRPD 0x{:02x}", idrp_discr);
        invalid_header(dec, range, reason);
    }

    // Parse length of fixed header.
    let (fixed_hdr_len, range) = get_u8(buf)?;
    node.add_leaf("PDU Header Length", range.clone(), fixed_hdr_len);
    if fixed_hdr_len as usize != hdr_len {
        let reason = format!(
            "invalid header length {} (should be {})",
            fixed_hdr_len, hdr_len
        );
        invalid_header(dec, range, reason);
    }

    // Parse version/protocol ID extension.
    let (version_proto_ext, range) = get_u8(buf)?;
    node.add_leaf(
        "Version/Protocol ID Extension",
        range.clone(),
        version_proto_ext,
    );
    if version_proto_ext != VERSION_PROTO_EXT {
        let reason = format!("invalid version {}", version_proto_ext);
        invalid_header(dec, range, reason);
    }

    // Parse ID length.
    let (id_len, range) = get_u8(buf)?;
    let text = match id_len {
        0 => format!("0 ({} bytes)", SYSTEM_ID_LEN),
        ID_LEN_ZERO => format!("{} (0 bytes)", ID_LEN_ZERO),
        _ => id_len.to_string(),
    };
    node.add_leaf("System ID Length", range.clone(), text);
    if id_len > MAX_SYSTEM_ID_LEN && id_len != ID_LEN_ZERO {
        let reason = format!("invalid ID length {}", id_len);
        invalid_header(dec, range, reason);
    }

    // Parse PDU type.
    let (pdu_type, range) = get_u8(buf)?;
    let pdu_type = pdu_type & PDU_TYPE_MASK;
    let text = match PduType::from_u8(pdu_type) {
        Some(name) => format!("{} ({})", pdu_type, name),
        None => pdu_type.to_string(),
    };
    node.add_leaf("PDU Type", range.clone(), text);
    if pdu_type != kind.pdu_type() as u8 {
        let reason =
            format!("PDU type {} doesn't match {}", pdu_type, kind.pdu_type());
        invalid_header(dec, range, reason);
    }

    // Parse version.
    let (version, range) = get_u8(buf)?;
    node.add_leaf("Version", range.clone(), version);
    if version != VERSION {
        let reason = format!("invalid version {}", version);
        invalid_header(dec, range, reason);
    }

    // Parse reserved field.
    node.add_field("Reserved", buf, BoundedReader::get_u8)?;

    // Parse maximum area addresses.
    let (max_area_addrs, range) = get_u8(buf)?;
    let text = match max_area_addrs {
        0 => format!("0 ({})", DFLT_MAX_AREA_ADDRS),
        _ => max_area_addrs.to_string(),
    };
    node.add_leaf("Maximum Area Addresses", range, text);

    Ok(())
}

// Decodes the LSP-specific header, returning the PDU length when it allows
// the body to be decoded.
fn decode_lsp_header(
    dec: &mut Decoder,
    buf: &mut BoundedReader,
    hdr_len: usize,
    config: &DecodeConfig,
    node: &mut FieldNode,
) -> ReadResult<Option<usize>> {
    let captured = buf.captured_len();

    // Parse PDU length.
    let start = buf.position();
    let pdu_len = node.add_field("PDU length", buf, BoundedReader::get_u16)?;
    let pdu_len = pdu_len as usize;
    let pdu_len_range = start..buf.position();

    // Parse remaining lifetime.
    let start = buf.position();
    let rem_lifetime = buf.get_u16()?;
    node.add_leaf(
        "Remaining lifetime",
        start..buf.position(),
        format!("{}s", rem_lifetime),
    );

    // Parse LSP ID.
    let start = buf.position();
    let lsp_id = LspId::decode(buf, dec.system_id_len())?;
    node.add_leaf("LSP-ID", start..buf.position(), &lsp_id);

    // Parse sequence number.
    let start = buf.position();
    let seqno = buf.get_u32()?;
    node.add_leaf(
        "Sequence number",
        start..buf.position(),
        format!("0x{:08x}", seqno),
    );

    // Parse checksum.
    let cksum_offset = buf.position();
    let cksum = buf.get_u16()?;
    let cksum_range = cksum_offset..buf.position();
    node.add_leaf("Checksum", cksum_range.clone(), format!("0x{:04x}", cksum));

    // Parse type block.
    let start = buf.position();
    let flags = LspFlags::from_bits_retain(buf.get_u8()?);
    let range = start..buf.position();
    let type_block = node.add_subtree("Type block", range.clone());
    type_block.set_value(flags_text(&flags));
    decode_type_block(dec, flags, range, type_block);

    // Sanity check the PDU length.
    if pdu_len < hdr_len {
        let reason = format!(
            "PDU length {} shorter than the header ({})",
            pdu_len, hdr_len
        );
        invalid_header(dec, pdu_len_range, reason);
        return Ok(None);
    }
    if pdu_len > captured {
        let kind = DiagnosticKind::Truncated {
            offset: captured,
            needed: pdu_len,
            available: captured,
        };
        dec.report(kind, captured..pdu_len);
    }

    // Verify the checksum.
    let status = if cksum == 0 {
        ChecksumStatus::NotPresent
    } else if !config.verify_checksum || pdu_len > captured {
        ChecksumStatus::Unverified
    } else {
        let data = buf.slice(LSP_ID_OFFSET, pdu_len - LSP_ID_OFFSET)?;
        if checksum_verify(&data) {
            ChecksumStatus::Correct
        } else {
            let computed =
                checksum_compute(&data, cksum_offset - LSP_ID_OFFSET);
            let kind = DiagnosticKind::ChecksumMismatch {
                expected: cksum,
                computed,
            };
            dec.report(kind, cksum_range.clone());
            ChecksumStatus::Incorrect
        }
    };
    Debug::PduChecksum(status).log();
    node.add_leaf("Checksum status", cksum_range, status);

    Ok(Some(pdu_len))
}

fn decode_type_block(
    dec: &mut Decoder,
    flags: LspFlags,
    range: Range<usize>,
    node: &mut FieldNode,
) {
    let is_set = |flag| match flags.contains(flag) {
        true => "set",
        false => "not set",
    };
    node.add_leaf("Partition repair", range.clone(), is_set(LspFlags::P));

    let att = [
        (LspFlags::ATT_DEFAULT, "Default metric"),
        (LspFlags::ATT_DELAY, "Delay metric"),
        (LspFlags::ATT_EXPENSE, "Expense metric"),
        (LspFlags::ATT_ERROR, "Error metric"),
    ];
    for (flag, label) in att {
        node.add_leaf(
            format!("Attached ({})", label),
            range.clone(),
            is_set(flag),
        );
    }
    node.add_leaf("Overload", range.clone(), is_set(LspFlags::OL));

    let is_type = flags & (LspFlags::IS_TYPE1 | LspFlags::IS_TYPE2);
    let text = match is_type.bits() {
        1 => "Level 1".to_owned(),
        2 => "Level 2".to_owned(),
        3 => "Level 1 and Level 2".to_owned(),
        bits => {
            let reason = format!("invalid IS type {}", bits);
            invalid_header(dec, range.clone(), reason);
            format!("Unknown ({})", bits)
        }
    };
    node.add_leaf("IS type", range, text);
}

fn get_u8(buf: &mut BoundedReader) -> ReadResult<(u8, Range<usize>)> {
    let start = buf.position();
    let value = buf.get_u8()?;
    Ok((value, start..buf.position()))
}

fn invalid_header(dec: &mut Decoder, range: Range<usize>, reason: String) {
    dec.report(DiagnosticKind::InvalidHeader { reason }, range);
}

// Checks the Fletcher checksum over the PDU contents, from the LSP ID
// onwards.
//
// Both running sums must be zero modulo 255.
fn checksum_verify(data: &[u8]) -> bool {
    let checksum = fletcher::calc_fletcher16(data);
    (checksum & 0x00ff) % 255 == 0 && (checksum >> 8) % 255 == 0
}

// Computes the value the checksum field should hold.
fn checksum_compute(data: &[u8], cksum_offset: usize) -> u16 {
    let mut data = data.to_vec();
    if let Some(field) = data.get_mut(cksum_offset..cksum_offset + 2) {
        field.fill(0);
    }
    let checksum = fletcher::calc_fletcher16(&data);
    let checkbyte0 = (checksum & 0x00ff) as i32;
    let checkbyte1 = ((checksum >> 8) & 0x00ff) as i32;

    // Adjust checksum value using scaling factor.
    let sop = data.len().saturating_sub(cksum_offset + 1) as i32;
    let mut x = (sop * checkbyte0 - checkbyte1) % 255;
    if x <= 0 {
        x += 255;
    }
    let mut y = 510 - checkbyte0 - x;
    if y > 255 {
        y -= 255;
    }
    u16::from_be_bytes([x as u8, y as u8])
}

// ===== unit tests =====

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

mod lsp;
mod properties;

use std::sync::LazyLock as Lazy;

use bytes::Bytes;
use holo_dissect::error::{DiagnosticKind, Severity};
use holo_dissect::packet::consts::SYSTEM_ID_LEN;
use holo_dissect::{
    BoundedReader, DecodeConfig, DecodeOutput, FieldNode, PduKind,
    decode_pdu_with_config,
};

//
// Helper functions.
//

fn decode(bytes: &[u8], kind: PduKind) -> DecodeOutput {
    decode_with_config(bytes, kind, &DecodeConfig::default())
}

fn decode_with_config(
    bytes: &[u8],
    kind: PduKind,
    config: &DecodeConfig,
) -> DecodeOutput {
    let buf = BoundedReader::new(Bytes::copy_from_slice(bytes));
    decode_pdu_with_config(buf, kind, SYSTEM_ID_LEN, config)
}

// Returns the value of the first node with the given label prefix.
fn value<'a>(node: &'a FieldNode, label: &str) -> Option<&'a str> {
    node.find(label).and_then(|node| node.value.as_deref())
}

// Returns the full label of the first node with the given label prefix.
fn label<'a>(node: &'a FieldNode, label: &str) -> Option<&'a str> {
    node.find(label).map(|node| node.label.as_str())
}

fn assert_no_diagnostics(output: &DecodeOutput) {
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
}

fn assert_ranges_nested(node: &FieldNode) {
    for child in &node.children {
        assert!(
            child.range.start >= node.range.start
                && child.range.end <= node.range.end,
            "{:?} ({:?}) escapes {:?} ({:?})",
            child.label,
            child.range,
            node.label,
            node.range
        );
        assert_ranges_nested(child);
    }
}

fn kinds(output: &DecodeOutput) -> Vec<&DiagnosticKind> {
    output.diagnostics.iter().map(|diag| &diag.kind).collect()
}

fn severities(output: &DecodeOutput) -> Vec<Severity> {
    output.diagnostics.iter().map(|diag| diag.severity).collect()
}

//
// Test packets.
//

// L1 LSP with SR and TE extensions.
static LSP1: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x01, 0x6a, 0x04,
        0x92, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x04, 0x4e, 0xaa, 0x01, 0x81, 0x01, 0xcc, 0xf2, 0x30, 0x01,
        0x01, 0x01, 0x01, 0x00, 0x02, 0x09, 0xc0, 0x00, 0x1f, 0x40, 0x01,
        0x03, 0x00, 0x3e, 0x80, 0x13, 0x01, 0x00, 0x16, 0x09, 0x00, 0x00,
        0x03, 0xe8, 0x01, 0x03, 0x00, 0x3a, 0x98, 0x17, 0x02, 0x01, 0x10,
        0x15, 0x0c, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00,
        0x00, 0x00, 0x03, 0x01, 0x04, 0x03, 0x49, 0x00, 0x00, 0x16, 0x61,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x0a, 0x56,
        0x03, 0x04, 0x00, 0x00, 0x00, 0x0f, 0x06, 0x04, 0x0a, 0x00, 0x01,
        0x01, 0x08, 0x04, 0x0a, 0x00, 0x01, 0x02, 0x09, 0x04, 0x4c, 0xee,
        0x6b, 0x28, 0x0a, 0x04, 0x4b, 0x3e, 0xbc, 0x20, 0x0b, 0x20, 0x4b,
        0x3e, 0xbc, 0x20, 0x4b, 0x3e, 0xbc, 0x20, 0x4b, 0x3e, 0xbc, 0x20,
        0x4b, 0x3e, 0xbc, 0x20, 0x4b, 0x3e, 0xbc, 0x20, 0x4b, 0x3e, 0xbc,
        0x20, 0x4b, 0x3e, 0xbc, 0x20, 0x4b, 0x3e, 0xbc, 0x20, 0x12, 0x03,
        0x00, 0x00, 0x64, 0x20, 0x0b, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x3a, 0x98, 0x0f, 0x02, 0x01, 0x10, 0x84, 0x04,
        0x01, 0x01, 0x01, 0x01, 0x87, 0x35, 0x00, 0x00, 0x00, 0x0a, 0x58,
        0x0a, 0x00, 0x01, 0x23, 0x04, 0x01, 0x40, 0x0b, 0x04, 0x01, 0x01,
        0x01, 0x01, 0x0c, 0x10, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x03, 0x06,
        0x40, 0x00, 0x00, 0x00, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x0a, 0x20,
        0x01, 0x01, 0x01, 0x01, 0x86, 0x04, 0x01, 0x01, 0x01, 0x01, 0xe8,
        0x10, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xec, 0x48, 0x00, 0x00, 0x00,
        0x0a, 0x20, 0x80, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x23, 0x04, 0x01,
        0x20, 0x0b, 0x04, 0x01, 0x01, 0x01, 0x01, 0x0c, 0x10, 0x20, 0x01,
        0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x03, 0x06, 0x40, 0x00, 0x00, 0x00, 0x00, 0x0b,
        0x00, 0x00, 0x00, 0x0a, 0x00, 0x40, 0x20, 0x01, 0x0d, 0xb8, 0x10,
        0x00, 0x00, 0x00, 0x8c, 0x10, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    ]
});

// L1 LSP with narrow metrics.
static LSP2: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x8d, 0x04,
        0xa3, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x13, 0xb3, 0x9b, 0x01, 0x81, 0x01, 0xcc, 0x01, 0x04, 0x03,
        0x49, 0x00, 0x00, 0x89, 0x04, 0x68, 0x6f, 0x6c, 0x6f, 0x0e, 0x02,
        0x05, 0xd4, 0x02, 0x17, 0x00, 0x0a, 0x80, 0x80, 0x80, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x04, 0x00, 0x0a, 0x80, 0x80, 0x80, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x05, 0x00, 0x84, 0x04, 0x06, 0x06, 0x06, 0x06,
        0x80, 0x24, 0x0a, 0x80, 0x80, 0x80, 0x0a, 0x00, 0x07, 0x00, 0xff,
        0xff, 0xff, 0x00, 0x0a, 0x80, 0x80, 0x80, 0x0a, 0x00, 0x08, 0x00,
        0xff, 0xff, 0xff, 0x00, 0x0a, 0x80, 0x80, 0x80, 0x06, 0x06, 0x06,
        0x06, 0xff, 0xff, 0xff, 0xff, 0x82, 0x18, 0x0a, 0x80, 0x80, 0x80,
        0xac, 0x10, 0x01, 0x00, 0xff, 0xff, 0xff, 0x00, 0x4a, 0x80, 0x80,
        0x80, 0xac, 0x10, 0x02, 0x00, 0xff, 0xff, 0xff, 0x00,
    ]
});

// L1 LSP authenticated with HMAC-MD5.
static LSP3_HMAC_MD5: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x5d, 0x04,
        0x92, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x04, 0xd5, 0x41, 0x01, 0x0a, 0x11, 0x36, 0xcf, 0xab, 0x8f,
        0xed, 0xdf, 0xeb, 0xb5, 0x7e, 0xf0, 0xf7, 0x84, 0x23, 0x6f, 0xf8,
        0x37, 0x17, 0x81, 0x01, 0xcc, 0x01, 0x04, 0x03, 0x49, 0x00, 0x00,
        0x16, 0x0b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00,
        0x0a, 0x00, 0x84, 0x04, 0x01, 0x01, 0x01, 0x01, 0x87, 0x11, 0x00,
        0x00, 0x00, 0x0a, 0x18, 0x0a, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0a,
        0x20, 0x01, 0x01, 0x01, 0x01,
    ]
});

// L1 LSP with cryptographic authentication (HMAC-SHA256).
static LSP3_HMAC_SHA256: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x6f, 0x04,
        0x92, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x04, 0x77, 0xa6, 0x01, 0x0a, 0x23, 0x03, 0x00, 0x01, 0xc2,
        0xd4, 0x57, 0xfb, 0xb0, 0x6b, 0xfe, 0x01, 0xec, 0x91, 0x30, 0x27,
        0xa2, 0x9e, 0xd1, 0xbd, 0xe3, 0x07, 0x74, 0xe5, 0x71, 0x87, 0xeb,
        0x78, 0x6c, 0x8f, 0xb0, 0x4c, 0xad, 0x46, 0x65, 0xb6, 0x81, 0x01,
        0xcc, 0x01, 0x04, 0x03, 0x49, 0x00, 0x00, 0x16, 0x0b, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x0a, 0x00, 0x84, 0x04,
        0x01, 0x01, 0x01, 0x01, 0x87, 0x11, 0x00, 0x00, 0x00, 0x0a, 0x18,
        0x0a, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0a, 0x20, 0x01, 0x01, 0x01,
        0x01,
    ]
});

// L1 LSP with multi-topology TLVs.
static LSP4: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x9a, 0x04,
        0x92, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x04, 0x3a, 0x4b, 0x01, 0x81, 0x02, 0xcc, 0x8e, 0x01, 0x04,
        0x03, 0x49, 0x00, 0x00, 0xe5, 0x04, 0x00, 0x00, 0x00, 0x02, 0x16,
        0x0b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x0a,
        0x00, 0xde, 0x0d, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
        0x03, 0x00, 0x00, 0x0a, 0x00, 0x84, 0x04, 0x01, 0x01, 0x01, 0x01,
        0x87, 0x11, 0x00, 0x00, 0x00, 0x0a, 0x18, 0x0a, 0x00, 0x01, 0x00,
        0x00, 0x00, 0x0a, 0x20, 0x01, 0x01, 0x01, 0x01, 0xe8, 0x10, 0x20,
        0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x01, 0xed, 0x26, 0x00, 0x02, 0x00, 0x00, 0x00,
        0x0a, 0x00, 0x80, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x0a, 0x00, 0x40, 0x20, 0x01, 0x0d, 0xb8, 0x10, 0x00, 0x00, 0x00,
    ]
});

// Purged L2 LSP.
static LSP5: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x14, 0x01, 0x00, 0x00, 0x00, 0x30, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x05, 0xd4, 0xc0, 0x02, 0x0d, 0x0d, 0x02, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x89, 0x04,
        0x68, 0x6f, 0x6c, 0x6f,
    ]
});

// L2 LSP with an ASLA sub-TLV and an unknown TLV.
static LSP_ASLA: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x14, 0x01, 0x00, 0x00, 0x00, 0x48, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0xc6, 0x54, 0x03, 0x81, 0x01, 0xcc, 0x16, 0x16, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x0a, 0x0b, 0x10,
        0x09, 0x01, 0x00, 0x80, 0x09, 0x04, 0x45, 0x48, 0x60, 0x00, 0x04,
        0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0xfa, 0x02, 0xaa, 0xbb,
        0x89, 0x04, 0x68, 0x6f, 0x6c, 0x6f,
    ]
});

// L1 LSP whose ASLA sub-TLVs nest deeper than the default limit.
static LSP_NESTED: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x42, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x00, 0x01, 0x16, 0x25, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x02, 0x00, 0x00, 0x00, 0x0a, 0x1a, 0x10, 0x18, 0x00, 0x00,
        0x10, 0x14, 0x00, 0x00, 0x10, 0x10, 0x00, 0x00, 0x10, 0x0c, 0x00,
        0x00, 0x10, 0x08, 0x00, 0x00, 0x09, 0x04, 0x45, 0x48, 0x60, 0x00,
    ]
});

// L1 LSP carrying a level 2 only TLV.
static LSP_PARTITION_L1: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x29, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x00, 0x01, 0x04, 0x06, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x09, 0x89, 0x04, 0x68, 0x6f, 0x6c, 0x6f,
    ]
});

// L1 LSP with a bad TLV length and a trailing byte.
static LSP_MALFORMED: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x27, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x00, 0x01, 0x0e, 0x03, 0x05, 0xd4, 0x00, 0x89,
        0x04, 0x68, 0x6f, 0x6c, 0x6f, 0x81,
    ]
});

// L1 LSP with SRv6, BIER and IPv6 Adj-SID extensions.
static LSP_SRV6: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0xa7, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x00, 0x01, 0x16, 0x26, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x02, 0x00, 0x00, 0x00, 0x0a, 0x1b, 0x1f, 0x12, 0x20, 0x00,
        0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x02, 0x1f, 0x05, 0x30, 0x00, 0x00, 0x3e,
        0x81, 0x87, 0x16, 0x00, 0x00, 0x00, 0x0a, 0x58, 0x0a, 0x00, 0x01,
        0x0d, 0x20, 0x0b, 0x00, 0x00, 0x01, 0x00, 0x05, 0x01, 0x04, 0x02,
        0x10, 0x00, 0x64, 0x95, 0x0d, 0x00, 0x00, 0x00, 0x10, 0x18, 0x0a,
        0x01, 0x02, 0x01, 0x03, 0x00, 0x3e, 0x80, 0xf2, 0x0b, 0x01, 0x01,
        0x01, 0x01, 0x00, 0x1a, 0x04, 0x80, 0x00, 0x00, 0x80, 0x1b, 0x2e,
        0x00, 0x02, 0x00, 0x00, 0x00, 0x0a, 0x80, 0x00, 0x40, 0x20, 0x01,
        0x0d, 0xb8, 0x00, 0x01, 0x00, 0x00, 0x1c, 0x05, 0x1a, 0x00, 0x00,
        0x01, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x06, 0x01, 0x04, 0x20, 0x10,
        0x10, 0x00,
    ]
});

// L1 LSP with a reserved metric bit, inconsistent Adj-SID flags and a short
// SRv6 End SID.
static LSP_SR_MALFORMED: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        0x83, 0x1b, 0x01, 0x00, 0x12, 0x01, 0x00, 0x00, 0x00, 0x66, 0x04,
        0xb0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x01, 0x00, 0x00, 0x01, 0x02, 0x0c, 0x00, 0x0a, 0x40, 0x80,
        0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0x16, 0x12, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x0a, 0x07, 0x1f,
        0x05, 0x00, 0x00, 0x00, 0x3e, 0x82, 0x1b, 0x27, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x0a, 0x00, 0x00, 0x40, 0x20, 0x01, 0x0d, 0xb8, 0x00,
        0x01, 0x00, 0x00, 0x15, 0x05, 0x13, 0x00, 0x00, 0x01, 0x20, 0x01,
        0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x01,
    ]
});

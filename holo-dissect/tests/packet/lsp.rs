//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use holo_dissect::error::{DiagnosticKind, Severity};
use holo_dissect::{DecodeConfig, PduKind};

use super::{
    LSP_ASLA, LSP_MALFORMED, LSP_NESTED, LSP_PARTITION_L1, LSP_SR_MALFORMED,
    LSP_SRV6, LSP1, LSP2, LSP3_HMAC_MD5, LSP3_HMAC_SHA256, LSP4, LSP5,
    assert_no_diagnostics, assert_ranges_nested, decode, decode_with_config,
    kinds, label, severities, value,
};

#[test]
fn test_decode_lsp1_header() {
    let output = decode(&LSP1, PduKind::L1);
    assert_no_diagnostics(&output);

    let root = &output.root;
    assert_eq!(root.label, "ISIS L1 LSP");
    assert_eq!(root.range, 0..362);
    assert_eq!(value(root, "PDU Header Length"), Some("27"));
    assert_eq!(value(root, "PDU Type"), Some("18 (L1 LSP)"));
    assert_eq!(value(root, "PDU length"), Some("362"));
    assert_eq!(value(root, "Remaining lifetime"), Some("1170s"));
    assert_eq!(value(root, "LSP-ID"), Some("0000.0000.0001.00-00"));
    assert_eq!(value(root, "Sequence number"), Some("0x00000004"));
    assert_eq!(value(root, "Checksum"), Some("0x4eaa"));
    assert_eq!(value(root, "Checksum status"), Some("correct"));
    assert_eq!(value(root, "IS type"), Some("Level 1"));
    assert_eq!(value(root, "Overload"), Some("not set"));
}

#[test]
fn test_decode_lsp1_tlvs() {
    let output = decode(&LSP1, PduKind::L1);
    let root = &output.root;
    let labels = root
        .children
        .iter()
        .map(|node| node.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            "Common header",
            "LSP header",
            "Protocols supported",
            "Router Capability: 1.1.1.1",
            "Area address(es)",
            "Extended IS reachability",
            "IP Interface address(es)",
            "Extended IP reachability",
            "Traffic Engineering Router ID: 1.1.1.1",
            "IPv6 Interface address(es)",
            "IPv6 reachability",
            "IPv6 TE Router ID: 2001:db8::1",
        ]
    );
    assert_eq!(value(root, "NLPID"), Some("0xcc (IPv4)"));
    assert_eq!(value(root, "Area address (3)"), Some("49.0000"));
    assert_ranges_nested(root);
}

#[test]
fn test_decode_lsp1_router_cap() {
    let output = decode(&LSP1, PduKind::L1);
    let router_cap = output.root.find("Router Capability").unwrap();

    let sr_cap = router_cap.child("SR-Capabilities").unwrap();
    assert_eq!(value(sr_cap, "Flags"), Some("0xc0 (I, V)"));
    assert_eq!(label(sr_cap, "Range entry"), Some("Range entry: 8000"));
    assert_eq!(label(sr_cap, "SID/Label"), Some("SID/Label: label 16000"));

    let srlb = router_cap.child("SR Local Block").unwrap();
    assert_eq!(label(srlb, "Range entry"), Some("Range entry: 1000"));
    assert_eq!(label(srlb, "SID/Label"), Some("SID/Label: label 15000"));

    let tags = router_cap.child("Node Admin Tag").unwrap();
    let tags = tags
        .children
        .iter()
        .filter_map(|node| node.value.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(tags, vec!["1", "2", "3"]);
    assert_eq!(value(router_cap, "MSD Base MPLS Imposition"), Some("16"));
}

#[test]
fn test_decode_lsp1_ext_is_reach() {
    let output = decode(&LSP1, PduKind::L1);
    let ext_is_reach = output.root.find("Extended IS reachability").unwrap();
    let neighbor = ext_is_reach.child("IS Neighbor").unwrap();
    assert_eq!(neighbor.label, "IS Neighbor: 0000.0000.0002.03");
    assert_eq!(value(neighbor, "Metric"), Some("10"));
    assert_eq!(value(neighbor, "SubCLV Length"), Some("86"));
    assert_eq!(
        label(neighbor, "Administrative group(s)"),
        Some("Administrative group(s): 0x0000000f")
    );
    assert_eq!(
        label(neighbor, "IPv4 interface address"),
        Some("IPv4 interface address: 10.0.1.1")
    );
    assert_eq!(
        label(neighbor, "IPv4 neighbor address"),
        Some("IPv4 neighbor address: 10.0.1.2")
    );
    assert_eq!(
        label(neighbor, "Maximum link bandwidth"),
        Some("Maximum link bandwidth: 1000.00 Mbps")
    );
    assert_eq!(
        label(neighbor, "Maximum reservable link bandwidth"),
        Some("Maximum reservable link bandwidth: 100.00 Mbps")
    );

    let unreserved = neighbor.child("Unreserved bandwidth").unwrap();
    assert_eq!(unreserved.children.len(), 8);
    assert_eq!(value(unreserved, "priority level 7"), Some("100.00 Mbps"));

    assert_eq!(
        label(neighbor, "TE default metric"),
        Some("TE default metric: 100")
    );
    let lan_adj_sid = neighbor.child("LAN-Adj-SID").unwrap();
    assert_eq!(lan_adj_sid.label, "LAN-Adj-SID: label 15000");
    assert_eq!(value(lan_adj_sid, "Flags"), Some("0x30 (V, L)"));
    assert_eq!(value(lan_adj_sid, "System-ID"), Some("0000.0000.0001"));
}

#[test]
fn test_decode_lsp1_reachability() {
    let output = decode(&LSP1, PduKind::L1);

    let ext_ip_reach = output.root.find("Extended IP reachability").unwrap();
    assert_eq!(ext_ip_reach.children.len(), 2);
    let prefix = &ext_ip_reach.children[0];
    assert_eq!(prefix.label, "IPv4 prefix: 10.0.1.0/24");
    assert_eq!(value(prefix, "Flags"), Some("0x40 (SUBTLVS)"));
    assert_eq!(
        label(prefix, "Prefix Attribute Flags"),
        Some("Prefix Attribute Flags")
    );
    assert_eq!(
        label(prefix, "IPv4 Source Router ID"),
        Some("IPv4 Source Router ID: 1.1.1.1")
    );
    assert_eq!(label(prefix, "Prefix-SID"), Some("Prefix-SID: index 0"));
    assert_eq!(ext_ip_reach.children[1].label, "IPv4 prefix: 1.1.1.1/32");

    let ipv6_reach = output.root.find("IPv6 reachability").unwrap();
    assert_eq!(ipv6_reach.children.len(), 2);
    let prefix = &ipv6_reach.children[0];
    assert_eq!(prefix.label, "IPv6 prefix: 2001:db8::1/128");
    assert_eq!(label(prefix, "Prefix-SID"), Some("Prefix-SID: index 1"));
    assert_eq!(
        ipv6_reach.children[1].label,
        "IPv6 prefix: 2001:db8:1000::/64"
    );
}

#[test]
fn test_decode_lsp2() {
    let output = decode(&LSP2, PduKind::L1);
    assert_no_diagnostics(&output);

    let root = &output.root;
    assert_eq!(label(root, "Hostname"), Some("Hostname: holo"));
    assert_eq!(label(root, "LSP Buffer Size"), Some("LSP Buffer Size: 1492"));

    let is_reach = root.child("IS Reachability").unwrap();
    assert_eq!(value(is_reach, "IsVirtual"), Some("0"));
    let neighbors = is_reach
        .children
        .iter()
        .filter(|node| node.label.starts_with("IS Neighbor"))
        .collect::<Vec<_>>();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].label, "IS Neighbor: 0000.0000.0004.00");
    assert_eq!(neighbors[1].label, "IS Neighbor: 0000.0000.0005.00");
    assert_eq!(value(neighbors[0], "Default metric"), Some("10"));
    assert_eq!(
        value(neighbors[0], "Delay metric"),
        Some("0, not supported")
    );

    let internal = root.child("IP Internal reachability").unwrap();
    assert_eq!(internal.children.len(), 3);
    assert_eq!(internal.children[0].label, "IPv4 prefix: 10.0.7.0/24");
    assert_eq!(internal.children[2].label, "IPv4 prefix: 6.6.6.6/32");
    assert_eq!(
        value(&internal.children[0], "Default metric"),
        Some("10, internal")
    );

    let external = root.child("IP External reachability").unwrap();
    assert_eq!(external.children.len(), 2);
    assert_eq!(external.children[1].label, "IPv4 prefix: 172.16.2.0/24");
    assert_eq!(
        value(&external.children[1], "Default metric"),
        Some("10, external")
    );
}

#[test]
fn test_decode_lsp3_auth() {
    let output = decode(&LSP3_HMAC_MD5, PduKind::L1);
    assert_no_diagnostics(&output);
    let auth = output.root.child("Authentication").unwrap();
    assert_eq!(auth.label, "Authentication: HMAC-MD5");
    assert_eq!(
        value(auth, "Digest"),
        Some("cfab8feddfebb57ef0f784236ff83717")
    );

    let output = decode(&LSP3_HMAC_SHA256, PduKind::L1);
    assert_no_diagnostics(&output);
    let auth = output.root.child("Authentication").unwrap();
    assert_eq!(auth.label, "Authentication: cryptographic");
    assert_eq!(value(auth, "Key ID"), Some("1"));
    assert_eq!(value(auth, "Digest").map(str::len), Some(64));
}

#[test]
fn test_decode_lsp4_multi_topology() {
    let output = decode(&LSP4, PduKind::L1);
    assert_no_diagnostics(&output);

    let root = &output.root;
    let protocols = root.child("Protocols supported").unwrap();
    assert_eq!(protocols.children[1].value.as_deref(), Some("0x8e (IPv6)"));

    let mt = root.child("Multi Topology").unwrap();
    assert_eq!(mt.children.len(), 2);
    assert!(
        mt.children[1]
            .value
            .as_deref()
            .unwrap()
            .starts_with("2 (IPv6 unicast)")
    );

    assert_eq!(
        label(root, "MT IS Reachability"),
        Some("MT IS Reachability: 2 (IPv6 unicast)")
    );
    let mt_ipv6_reach = root.child("Multi Topology IPv6 reachability").unwrap();
    assert_eq!(value(mt_ipv6_reach, "Topology ID"), Some("2 (IPv6 unicast)"));
    let prefixes = mt_ipv6_reach
        .children
        .iter()
        .filter(|node| node.label.starts_with("IPv6 prefix"))
        .map(|node| node.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        prefixes,
        vec![
            "IPv6 prefix: 2001:db8::1/128",
            "IPv6 prefix: 2001:db8:1000::/64"
        ]
    );
}

#[test]
fn test_decode_lsp5_purge() {
    let output = decode(&LSP5, PduKind::L2);
    assert_no_diagnostics(&output);

    let root = &output.root;
    assert_eq!(root.label, "ISIS L2 LSP");
    assert_eq!(value(root, "Remaining lifetime"), Some("0s"));
    assert_eq!(value(root, "IS type"), Some("Level 2"));
    let purge = root.child("Purge Originator Identification").unwrap();
    assert_eq!(value(purge, "Number of System IDs"), Some("2"));
    assert_eq!(
        value(purge, "System ID of originating IS"),
        Some("0000.0000.0002")
    );
    assert_eq!(
        value(purge, "System ID of IS from which received"),
        Some("0000.0000.0003")
    );
}

#[test]
fn test_decode_asla() {
    let output = decode(&LSP_ASLA, PduKind::L2);
    assert_eq!(value(&output.root, "Checksum status"), Some("correct"));

    let asla = output
        .root
        .find("Application-Specific Link Attributes")
        .unwrap();
    assert_eq!(
        value(asla, "Standard Application Identifier Bit Mask"),
        Some("80 0x80 (R)")
    );
    assert_eq!(
        label(asla, "Maximum link bandwidth"),
        Some("Maximum link bandwidth: 0.03 Mbps")
    );
    assert_eq!(
        label(&output.root, "Partition Designated Level 2 IS"),
        Some("Partition Designated Level 2 IS: 0000.0000.0009")
    );
    assert_eq!(label(&output.root, "Hostname"), Some("Hostname: holo"));
}

#[test]
fn test_decode_unknown_tlv() {
    let output = decode(&LSP_ASLA, PduKind::L2);
    assert_eq!(
        kinds(&output),
        vec![&DiagnosticKind::UnknownAttribute {
            code: 250,
            length: 2
        }]
    );
    assert_eq!(severities(&output), vec![Severity::Note]);
    assert!(!output.has_errors());

    let unknown = output.root.child("Unknown code").unwrap();
    assert_eq!(unknown.label, "Unknown code (t=250, l=2)");
    assert_eq!(unknown.range, 64..66);
    assert_eq!(unknown.value.as_deref(), Some("aabb"));
}

#[test]
fn test_decode_level_specific_tlv() {
    // The Partition Designated Level 2 IS TLV isn't valid in L1 LSPs.
    let output = decode(&LSP_PARTITION_L1, PduKind::L1);
    assert_eq!(
        kinds(&output),
        vec![&DiagnosticKind::UnknownAttribute { code: 4, length: 6 }]
    );
    assert_eq!(label(&output.root, "Hostname"), Some("Hostname: holo"));
}

#[test]
fn test_decode_nesting_limit() {
    let output = decode(&LSP_NESTED, PduKind::L1);
    assert_eq!(
        kinds(&output),
        vec![&DiagnosticKind::RecursionLimitExceeded {
            code: 16,
            depth: 5,
            max_depth: 5
        }]
    );
    assert!(output.has_errors());
    assert_eq!(value(&output.root, "Opaque data"), Some("090445486000"));
    assert!(output.root.find("Maximum link bandwidth").is_none());

    // A higher limit lets the innermost sub-TLV be decoded.
    let config = DecodeConfig {
        max_depth: 6,
        ..Default::default()
    };
    let output = decode_with_config(&LSP_NESTED, PduKind::L1, &config);
    assert_no_diagnostics(&output);
    assert_eq!(
        label(&output.root, "Maximum link bandwidth"),
        Some("Maximum link bandwidth: 0.03 Mbps")
    );
}

#[test]
fn test_decode_malformed() {
    let output = decode(&LSP_MALFORMED, PduKind::L1);
    assert_eq!(
        kinds(&output),
        vec![
            &DiagnosticKind::MalformedAttribute {
                code: 14,
                length: 3,
                reason: "Invalid length 3 (should be 2)".to_owned(),
            },
            &DiagnosticKind::TrailingGarbage { length: 1 },
        ]
    );
    assert_eq!(output.diagnostics[0].range, 27..32);
    assert_eq!(output.diagnostics[1].range, 38..39);
    assert!(!output.has_errors());

    // Decoding carries on past the malformed TLV.
    let root = &output.root;
    assert_eq!(label(root, "LSP Buffer Size"), Some("LSP Buffer Size: 1492"));
    assert_eq!(label(root, "Hostname"), Some("Hostname: holo"));
}

#[test]
fn test_decode_checksum_mismatch() {
    let mut bytes = LSP2.clone();
    let pos = bytes.windows(4).position(|w| w == b"holo").unwrap();
    bytes[pos] = b'H';

    let output = decode(&bytes, PduKind::L1);
    assert_eq!(
        kinds(&output),
        vec![&DiagnosticKind::ChecksumMismatch {
            expected: 0xb39b,
            computed: 0x125d
        }]
    );
    assert_eq!(output.diagnostics[0].range, 24..26);
    assert_eq!(value(&output.root, "Checksum status"), Some("incorrect"));
    assert_eq!(label(&output.root, "Hostname"), Some("Hostname: Holo"));
}

#[test]
fn test_decode_checksum_status() {
    // Zero checksum.
    let output = decode(&LSP_MALFORMED, PduKind::L1);
    assert_eq!(value(&output.root, "Checksum status"), Some("not present"));

    // Verification disabled.
    let config = DecodeConfig {
        verify_checksum: false,
        ..Default::default()
    };
    let output = decode_with_config(&LSP1, PduKind::L1, &config);
    assert_no_diagnostics(&output);
    assert_eq!(value(&output.root, "Checksum status"), Some("unverified"));

    // Truncated capture.
    let output = decode(&LSP1[..100], PduKind::L1);
    assert_eq!(value(&output.root, "Checksum status"), Some("unverified"));
    assert_eq!(
        kinds(&output)[0],
        &DiagnosticKind::Truncated {
            offset: 100,
            needed: 362,
            available: 100
        }
    );
}

#[test]
fn test_decode_wrong_level() {
    let output = decode(&LSP1, PduKind::L2);
    assert_eq!(
        kinds(&output),
        vec![&DiagnosticKind::InvalidHeader {
            reason: "PDU type 18 doesn't match L2 LSP".to_owned()
        }]
    );
    assert_eq!(output.diagnostics[0].range, 4..5);

    // The TLVs are still decoded.
    assert!(output.root.find("Router Capability").is_some());
}

#[test]
fn test_decode_padding() {
    // Bytes captured past the PDU length are ignored.
    let mut bytes = LSP2.clone();
    bytes.extend_from_slice(&[0x00; 16]);
    let output = decode(&bytes, PduKind::L1);
    assert_no_diagnostics(&output);
    assert_eq!(output.root.range, 0..157);
    assert_eq!(output.root.children, decode(&LSP2, PduKind::L1).root.children);
}

#[test]
fn test_decode_srv6_tlvs() {
    let output = decode(&LSP_SRV6, PduKind::L1);
    assert_no_diagnostics(&output);
    let root = &output.root;
    let labels = root
        .children
        .iter()
        .map(|node| node.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            "Common header",
            "LSP header",
            "Extended IS reachability",
            "Extended IP reachability",
            "SID/Label Binding: 10.1.2.0/24",
            "Router Capability: 1.1.1.1",
            "SRv6 Locator",
        ]
    );
    assert_ranges_nested(root);

    let locator = root.find("SRv6 Locator").unwrap();
    assert_eq!(locator.range, 119..167);
    assert_eq!(
        label(locator, "Locator entry"),
        Some("Locator entry: 2001:db8:1::/64")
    );
    let end_sid = locator.find("SRv6 End SID").unwrap();
    assert_eq!(end_sid.label, "SRv6 End SID: 2001:db8:1::1");
    assert_eq!(end_sid.range, 139..167);
    assert_eq!(end_sid.child("SID").unwrap().range, 144..160);
    let structure = end_sid.child("SRv6 SID Structure").unwrap();
    assert_eq!(structure.label, "SRv6 SID Structure: 32/16/16/0");
    assert_eq!(structure.range, 161..167);
}

#[test]
fn test_decode_ipv6_adj_sid() {
    let output = decode(&LSP_SRV6, PduKind::L1);
    let neighbor = output.root.find("IS Neighbor").unwrap();
    assert_eq!(neighbor.label, "IS Neighbor: 0000.0000.0002.00");
    let adj_sids = neighbor
        .children
        .iter()
        .filter(|node| node.label.starts_with("Adj-SID"))
        .collect::<Vec<_>>();
    assert_eq!(adj_sids.len(), 2);

    // A 16-byte SID is an IPv6 address and only needs the V flag.
    assert_eq!(adj_sids[0].label, "Adj-SID: 2001:db8::2");
    assert_eq!(adj_sids[0].range, 40..60);
    assert_eq!(value(adj_sids[0], "Flags"), Some("0x20 (V)"));
    assert_eq!(adj_sids[0].child("SID").unwrap().range, 44..60);

    assert_eq!(adj_sids[1].label, "Adj-SID: label 16001");
    assert_eq!(value(adj_sids[1], "Flags"), Some("0x30 (V, L)"));
    assert_eq!(adj_sids[1].child("SID").unwrap().range, 64..67);
}

#[test]
fn test_decode_bier_info() {
    let output = decode(&LSP_SRV6, PduKind::L1);
    let prefix = output.root.find("IPv4 prefix").unwrap();
    assert_eq!(prefix.label, "IPv4 prefix: 10.0.1.0/24");

    let bier = prefix.child("BIER Info").unwrap();
    assert_eq!(bier.label, "BIER Info: sub-domain 1, BFR-ID 5");
    assert_eq!(bier.range, 78..91);
    assert_eq!(bier.child("BFR-ID").unwrap().range, 83..85);

    let mpls = bier.child("BIER MPLS Encapsulation").unwrap();
    assert_eq!(mpls.range, 85..91);
    assert_eq!(value(mpls, "Max SI"), Some("2"));
    assert_eq!(value(mpls, "BS Length"), Some("1"));
    assert_eq!(value(mpls, "Label"), Some("100"));
}

#[test]
fn test_decode_binding_and_fad() {
    let output = decode(&LSP_SRV6, PduKind::L1);
    let binding = output.root.find("SID/Label Binding").unwrap();
    assert_eq!(binding.range, 91..106);
    assert_eq!(binding.child("FEC Prefix").unwrap().range, 98..101);
    let sid_label = binding.child("SID/Label").unwrap();
    assert_eq!(sid_label.label, "SID/Label: label 16000");
    assert_eq!(sid_label.range, 101..106);

    let router_cap = output.root.find("Router Capability").unwrap();
    let fad = router_cap.child("Flexible Algorithm Definition").unwrap();
    assert_eq!(fad.label, "Flexible Algorithm Definition: 128");
    assert_eq!(fad.range, 113..119);
    assert_eq!(value(fad, "Priority"), Some("128"));
}

#[test]
fn test_decode_sr_malformed() {
    let output = decode(&LSP_SR_MALFORMED, PduKind::L1);
    let kinds = kinds(&output);
    assert_eq!(kinds.len(), 4);
    assert_eq!(
        kinds[0],
        &DiagnosticKind::MalformedAttribute {
            code: 2,
            length: 12,
            reason: "Delay metric reserved bit set".to_owned(),
        }
    );
    assert_eq!(
        kinds[1],
        &DiagnosticKind::MalformedAttribute {
            code: 31,
            length: 5,
            reason: "V/L flags (0/0) inconsistent with 3-byte SID".to_owned(),
        }
    );
    assert_eq!(
        kinds[2],
        &DiagnosticKind::MalformedAttribute {
            code: 5,
            length: 19,
            reason: "Too short length 19 (min 20)".to_owned(),
        }
    );
    assert!(matches!(kinds[3], DiagnosticKind::OutOfBounds { .. }));
    let ranges = output
        .diagnostics
        .iter()
        .map(|diag| diag.range.clone())
        .collect::<Vec<_>>();
    assert_eq!(ranges, vec![31..32, 58..61, 81..102, 83..102]);
    assert_eq!(
        severities(&output),
        vec![
            Severity::Warning,
            Severity::Warning,
            Severity::Warning,
            Severity::Error
        ]
    );

    // The flagged fields are still decoded.
    let root = &output.root;
    assert_eq!(value(root, "Delay metric"), Some("0"));
    assert_eq!(value(root, "Expense metric"), Some("0, not supported"));
    assert_eq!(label(root, "Adj-SID"), Some("Adj-SID: label 16002"));
    assert_eq!(
        label(root, "SRv6 End SID"),
        Some("SRv6 End SID: 2001:db8::1")
    );
}

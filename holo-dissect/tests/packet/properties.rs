//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use holo_dissect::error::DiagnosticKind;
use holo_dissect::{DecodeConfig, DecodeOutput, PduKind};

use super::{
    LSP_ASLA, LSP_MALFORMED, LSP_NESTED, LSP_PARTITION_L1, LSP_SR_MALFORMED,
    LSP_SRV6, LSP1, LSP2, LSP3_HMAC_MD5, LSP3_HMAC_SHA256, LSP4, LSP5,
    assert_ranges_nested, decode, decode_with_config, kinds,
};

fn fixtures() -> Vec<(&'static str, &'static [u8], PduKind)> {
    vec![
        ("lsp1", LSP1.as_slice(), PduKind::L1),
        ("lsp2", LSP2.as_slice(), PduKind::L1),
        ("lsp3-hmac-md5", LSP3_HMAC_MD5.as_slice(), PduKind::L1),
        ("lsp3-hmac-sha256", LSP3_HMAC_SHA256.as_slice(), PduKind::L1),
        ("lsp4", LSP4.as_slice(), PduKind::L1),
        ("lsp5", LSP5.as_slice(), PduKind::L2),
        ("lsp-asla", LSP_ASLA.as_slice(), PduKind::L2),
        ("lsp-nested", LSP_NESTED.as_slice(), PduKind::L1),
        ("lsp-partition-l1", LSP_PARTITION_L1.as_slice(), PduKind::L1),
        ("lsp-malformed", LSP_MALFORMED.as_slice(), PduKind::L1),
        ("lsp-srv6", LSP_SRV6.as_slice(), PduKind::L1),
        ("lsp-sr-malformed", LSP_SR_MALFORMED.as_slice(), PduKind::L1),
    ]
}

// Every node must stay within the frame, and every diagnostic must start
// inside it. Truncation diagnostics may extend past the captured bytes.
fn assert_bounded(name: &str, output: &DecodeOutput) {
    let root = &output.root;
    assert_ranges_nested(root);
    for diag in &output.diagnostics {
        assert!(
            diag.range.start <= diag.range.end,
            "{}: inverted range {:?}",
            name,
            diag.range
        );
        assert!(
            diag.range.start <= root.range.end,
            "{}: {:?} escapes {:?}",
            name,
            diag,
            root.range
        );
    }
}

#[test]
fn test_fixtures_ranges_nested() {
    for (name, bytes, kind) in fixtures() {
        let output = decode(bytes, kind);
        assert_eq!(output.root.range, 0..bytes.len(), "{}", name);
        assert_bounded(name, &output);
    }
}

#[test]
fn test_truncated_prefixes() {
    for (name, bytes, kind) in fixtures() {
        let full = decode(bytes, kind);
        let full_errors = full.has_errors();

        for len in 0..bytes.len() {
            let output = decode(&bytes[..len], kind);
            assert_bounded(name, &output);

            // A short capture always leaves a trace.
            assert!(
                output.has_errors(),
                "{}: no error at length {}",
                name,
                len
            );

            // Only truncation related errors show up on top of the ones the
            // full PDU already has.
            if !full_errors {
                for kind in kinds(&output) {
                    assert!(
                        matches!(
                            kind,
                            DiagnosticKind::Truncated { .. }
                                | DiagnosticKind::OutOfBounds { .. }
                                | DiagnosticKind::UnknownAttribute { .. }
                                | DiagnosticKind::MalformedAttribute { .. }
                                | DiagnosticKind::TrailingGarbage { .. }
                        ),
                        "{}: unexpected {:?} at length {}",
                        name,
                        kind,
                        len
                    );
                }
            }
        }
    }
}

#[test]
fn test_truncated_lsp1() {
    for len in 0..LSP1.len() {
        let output = decode(&LSP1[..len], PduKind::L1);
        for kind in kinds(&output) {
            assert!(
                matches!(
                    kind,
                    DiagnosticKind::Truncated { .. }
                        | DiagnosticKind::OutOfBounds { .. }
                ),
                "unexpected {:?} at length {}",
                kind,
                len
            );
        }
    }
}

#[test]
fn test_corrupted_bytes() {
    // Overwrite each byte in turn with values that stress length fields.
    for (name, bytes, kind) in fixtures() {
        for pos in 0..bytes.len() {
            for byte in [0x00, 0x01, 0x7f, 0xff] {
                let mut bytes = bytes.to_vec();
                bytes[pos] = byte;
                let output = decode(&bytes, kind);
                assert_bounded(name, &output);
            }
        }
    }
}

#[test]
fn test_depth_limit_is_honored() {
    for max_depth in 0..8 {
        let config = DecodeConfig {
            max_depth,
            ..Default::default()
        };
        let output = decode_with_config(&LSP_NESTED, PduKind::L1, &config);
        let exceeded = kinds(&output)
            .into_iter()
            .filter_map(|kind| match kind {
                DiagnosticKind::RecursionLimitExceeded { depth, .. } => {
                    Some(*depth)
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        // Six levels of nesting below the top-level TLV.
        if max_depth < 6 {
            assert_eq!(exceeded, vec![max_depth], "max_depth {}", max_depth);
            assert!(output.root.find("Opaque data").is_some());
        } else {
            assert!(exceeded.is_empty(), "max_depth {}", max_depth);
        }
    }
}

#[test]
fn test_deterministic() {
    for (name, bytes, kind) in fixtures() {
        assert_eq!(decode(bytes, kind), decode(bytes, kind), "{}", name);
    }
}

#[test]
fn test_output_serialization() {
    let output = decode(&LSP_ASLA, PduKind::L2);
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["root"]["label"], "ISIS L2 LSP");
    assert_eq!(json["diagnostics"][0]["severity"], "note");

    let decoded: DecodeOutput = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, output);
}

#[test]
fn test_config_deserialization() {
    let config: DecodeConfig =
        serde_json::from_str(r#"{ "max_depth": 3 }"#).unwrap();
    assert_eq!(config.max_depth, 3);
    assert!(config.verify_checksum);

    let config: DecodeConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DecodeConfig::default());
    assert_eq!(config.max_depth, 5);

    let error = serde_json::from_str::<DecodeConfig>(r#"{ "depth": 3 }"#);
    assert!(error.is_err());
}

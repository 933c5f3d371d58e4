//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//
#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use holo_dissect::{
    BoundedReader, DecodeConfig, PduKind, decode_pdu_with_config,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    level2: bool,
    system_id_len: u8,
    max_depth: u8,
    verify_checksum: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let kind = if input.level2 { PduKind::L2 } else { PduKind::L1 };
    let system_id_len = input.system_id_len % 8 + 1;
    let config = DecodeConfig {
        max_depth: (input.max_depth % 16) as u32,
        verify_checksum: input.verify_checksum,
    };
    let captured = input.data.len();
    let buf = BoundedReader::new(Bytes::from(input.data));
    let output = decode_pdu_with_config(buf, kind, system_id_len, &config);

    // Nodes never point past the claimed PDU.
    let end = output.root.range.end;
    assert!(end >= captured);
    for node in output.root.iter() {
        assert!(node.range.start <= node.range.end);
        assert!(node.range.end <= end);
    }
});

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//
#![no_main]

use bytes::Bytes;
use holo_dissect::attr::Decoder;
use holo_dissect::attr::cursor::walk;
use holo_dissect::packet::consts::SYSTEM_ID_LEN;
use holo_dissect::packet::tlv::LSP_L1_TLVS;
use holo_dissect::{BoundedReader, FieldNode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut dec = Decoder::new(5, SYSTEM_ID_LEN);
    let mut buf = BoundedReader::new(Bytes::copy_from_slice(data));
    let mut root = FieldNode::new("TLVs", buf.range());
    walk(&mut dec, &mut buf, &LSP_L1_TLVS, &mut root);

    // The walk unwinds completely and stays within the input.
    assert_eq!(dec.depth(), 0);
    for node in root.iter() {
        assert!(node.range.end <= data.len());
    }
});

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use serde::{Deserialize, Serialize};

use crate::attr::guard::RecursionGuard;

// Decoder tunables.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
    // Maximum number of nested registries a single PDU may descend into.
    pub max_depth: u32,
    // Verify the LSP checksum when the whole PDU was captured.
    pub verify_checksum: bool,
}

// ===== impl DecodeConfig =====

impl Default for DecodeConfig {
    fn default() -> DecodeConfig {
        DecodeConfig {
            max_depth: RecursionGuard::DFLT_MAX_DEPTH,
            verify_checksum: true,
        }
    }
}

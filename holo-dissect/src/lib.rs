//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod attr;
pub mod config;
pub mod debug;
pub mod error;
pub mod packet;
pub mod reader;
pub mod tree;

pub use crate::config::DecodeConfig;
pub use crate::packet::pdu::{PduKind, decode_pdu, decode_pdu_with_config};
pub use crate::reader::BoundedReader;
pub use crate::tree::{DecodeOutput, FieldNode};

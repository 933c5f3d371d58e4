//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use crate::attr::{AttrRecord, Decoder};
use crate::error::ReadResult;
use crate::reader::BoundedReader;
use crate::tree::FieldNode;

// Type aliases.
pub type DecodeFn = fn(
    &mut Decoder,
    &AttrRecord,
    &mut BoundedReader,
    &mut FieldNode,
) -> ReadResult<()>;

/// Code-indexed table of attribute handlers for one nesting level.
///
/// Registries are built once and never modified afterwards, so a single
/// instance is shared by every decode operation.
#[derive(Clone)]
pub struct AttributeRegistry {
    name: &'static str,
    slots: [Option<HandlerDescriptor>; 256],
}

#[derive(Clone, Copy)]
pub struct HandlerDescriptor {
    pub label: &'static str,
    pub decode: DecodeFn,
    pub min_length: Option<u8>,
    pub max_length: Option<u8>,
}

// ===== impl AttributeRegistry =====

impl AttributeRegistry {
    pub fn new(name: &'static str) -> Self {
        AttributeRegistry {
            name,
            slots: [None; 256],
        }
    }

    /// Registers a handler, replacing any previous one for the same code.
    pub fn register(mut self, code: u8, descriptor: HandlerDescriptor) -> Self {
        self.slots[code as usize] = Some(descriptor);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, code: u8) -> Option<&HandlerDescriptor> {
        self.slots[code as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(code, slot)| {
                slot.as_ref().map(|desc| (code, desc.label))
            });
        f.debug_struct("AttributeRegistry")
            .field("name", &self.name)
            .field("handlers", &codes.collect::<Vec<_>>())
            .finish()
    }
}

// ===== impl HandlerDescriptor =====

impl HandlerDescriptor {
    pub const fn new(label: &'static str, decode: DecodeFn) -> Self {
        HandlerDescriptor {
            label,
            decode,
            min_length: None,
            max_length: None,
        }
    }

    pub const fn with_min_length(mut self, min_length: u8) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub const fn with_max_length(mut self, max_length: u8) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub const fn with_length(self, length: u8) -> Self {
        self.with_min_length(length).with_max_length(length)
    }

    /// Checks a declared length against the descriptor bounds, returning a
    /// description of the violation, if any.
    pub fn check_length(&self, length: u8) -> Option<String> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min == max && length != min => Some(
                format!("Invalid length {} (should be {})", length, min),
            ),
            (Some(min), _) if length < min => {
                Some(format!("Too short length {} (min {})", length, min))
            }
            (_, Some(max)) if length > max => {
                Some(format!("Too long length {} (max {})", length, max))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("label", &self.label)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .finish()
    }
}

// ===== unit tests =====

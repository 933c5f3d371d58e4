//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use tracing::debug_span;

use crate::attr::registry::AttributeRegistry;
use crate::attr::{AttrRecord, Decoder, TLV_HDR_SIZE};
use crate::error::{DiagnosticKind, ReadError};
use crate::reader::BoundedReader;
use crate::tree::{FieldNode, hex};

// ===== global functions =====

/// Decodes the sequence of code-length-value records that fills `buf`,
/// appending one node per record to `parent`.
///
/// The claimed end of `buf` is the budget. Every iteration consumes at least
/// the two header bytes, and a record is only decoded once its declared
/// length is known to fit in what is left, so the walk always terminates
/// without leaving the region.
pub fn walk(
    dec: &mut Decoder,
    buf: &mut BoundedReader,
    registry: &AttributeRegistry,
    parent: &mut FieldNode,
) {
    while buf.remaining() >= TLV_HDR_SIZE {
        let offset = buf.position();

        // Parse the record header.
        let (code, length) =
            match (buf.read_u8(offset), buf.read_u8(offset + 1)) {
                (Ok(code), Ok(length)) => (code, length),
                _ => {
                    let kind = DiagnosticKind::Truncated {
                        offset,
                        needed: TLV_HDR_SIZE,
                        available: buf.captured_remaining(),
                    };
                    dec.report(kind, offset..buf.end());
                    return;
                }
            };

        // Validate the record length against the parent budget.
        let available = buf.remaining() - TLV_HDR_SIZE;
        if length as usize > available {
            let kind = DiagnosticKind::LengthExceedsParent {
                code,
                declared: length,
                available,
            };
            dec.report(kind, offset..buf.end());
            return;
        }
        let rec = AttrRecord::new(code, length, offset);
        let Ok(mut value) = buf
            .skip(TLV_HDR_SIZE)
            .and_then(|_| buf.split_to(length as usize))
        else {
            return;
        };

        let span = if dec.depth() == 0 {
            debug_span!("TLV", r#type = code, length)
        } else {
            debug_span!("sub-TLV", r#type = code, length)
        };
        let _span_guard = span.enter();

        // Look up the handler for this code.
        let Some(desc) = registry.get(code) else {
            let kind = DiagnosticKind::UnknownAttribute { code, length };
            dec.report(kind, rec.range.clone());
            let bytes = value.take_rest();
            parent.add_leaf(
                format!("Unknown code (t={}, l={})", code, length),
                rec.value.clone(),
                hex(&bytes),
            );
            continue;
        };

        let node = parent.add_subtree(desc.label, rec.range.clone());
        if let Some(reason) = desc.check_length(length) {
            dec.malformed(&rec, rec.range.clone(), reason);
        }
        if let Err(error) = (desc.decode)(dec, &rec, &mut value, node) {
            let ReadError::OutOfBounds { offset, length, .. } = error;
            let kind = DiagnosticKind::OutOfBounds { offset, length };
            dec.report(kind, rec.value.clone());
        }
    }

    // Fewer bytes than a record header remain.
    let leftover = buf.remaining();
    if leftover == 1 {
        let kind = DiagnosticKind::TrailingGarbage { length: leftover };
        dec.report(kind, buf.position()..buf.end());
        buf.take_rest();
    }
}

/// Descends into the nested records that make up the rest of `buf`.
///
/// When the nesting limit is reached, the bytes are kept as a single opaque
/// leaf instead.
pub fn walk_nested(
    dec: &mut Decoder,
    rec: &AttrRecord,
    buf: &mut BoundedReader,
    registry: &AttributeRegistry,
    node: &mut FieldNode,
) {
    let range = buf.position()..buf.end();
    match dec.descend(rec, range.clone()) {
        Some(mut scope) => walk(&mut scope, buf, registry, node),
        None => {
            let bytes = buf.take_rest();
            node.add_leaf("Opaque data", range, hex(&bytes));
        }
    }
}

// ===== unit tests =====

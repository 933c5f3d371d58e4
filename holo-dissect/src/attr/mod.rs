//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod cursor;
pub mod guard;
pub mod registry;

use std::ops::Range;

use crate::attr::guard::{DepthScope, Guarded, RecursionGuard};
use crate::debug::Debug;
use crate::error::{Diagnostic, DiagnosticKind};

pub const TLV_HDR_SIZE: usize = 2;

// Header of one code-length-value record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrRecord {
    pub code: u8,
    pub length: u8,
    // Header and value.
    pub range: Range<usize>,
    // Value only.
    pub value: Range<usize>,
}

/// Per-PDU decoding state shared by all handlers of one decode operation.
#[derive(Debug)]
pub struct Decoder {
    guard: RecursionGuard,
    diagnostics: Vec<Diagnostic>,
    system_id_len: u8,
}

// ===== impl AttrRecord =====

impl AttrRecord {
    pub fn new(code: u8, length: u8, offset: usize) -> Self {
        let value_start = offset + TLV_HDR_SIZE;
        AttrRecord {
            code,
            length,
            range: offset..value_start + length as usize,
            value: value_start..value_start + length as usize,
        }
    }
}

// ===== impl Decoder =====

impl Decoder {
    pub fn new(max_depth: u32, system_id_len: u8) -> Self {
        Decoder {
            guard: RecursionGuard::new(max_depth),
            diagnostics: vec![],
            system_id_len,
        }
    }

    pub fn system_id_len(&self) -> usize {
        self.system_id_len as usize
    }

    pub fn depth(&self) -> u32 {
        self.guard.depth()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // Records a diagnostic.
    pub fn report(&mut self, kind: DiagnosticKind, range: Range<usize>) {
        let diag = Diagnostic::new(kind, range);
        diag.log();
        self.diagnostics.push(diag);
    }

    // Records a structural problem found inside the given record.
    pub fn malformed(
        &mut self,
        rec: &AttrRecord,
        range: Range<usize>,
        reason: impl Into<String>,
    ) {
        let kind = DiagnosticKind::MalformedAttribute {
            code: rec.code,
            length: rec.length,
            reason: reason.into(),
        };
        self.report(kind, range);
    }

    /// Descends one nesting level below the given record.
    ///
    /// When the depth limit is reached, a diagnostic covering `range` is
    /// recorded and `None` is returned, in which case the caller must not
    /// decode the nested bytes.
    pub fn descend(
        &mut self,
        rec: &AttrRecord,
        range: Range<usize>,
    ) -> Option<DepthScope<'_, Decoder>> {
        if let Err(error) = self.guard.check() {
            let kind = DiagnosticKind::RecursionLimitExceeded {
                code: rec.code,
                depth: error.depth,
                max_depth: error.max_depth,
            };
            self.report(kind, range);
            return None;
        }

        let scope = DepthScope::enter(self).ok()?;
        Debug::Descend(rec.code, scope.depth()).log();
        Some(scope)
    }
}

impl Guarded for Decoder {
    fn guard_mut(&mut self) -> &mut RecursionGuard {
        &mut self.guard
    }
}

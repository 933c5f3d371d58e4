//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Type aliases.
pub type ReadResult<T> = Result<T, ReadError>;

// Bounded read errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum ReadError {
    OutOfBounds {
        offset: usize,
        length: usize,
        limit: usize,
    },
}

// Structural problems found while decoding, attached to a byte range.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range<usize>,
    pub kind: DiagnosticKind,
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DiagnosticKind {
    OutOfBounds {
        offset: usize,
        length: usize,
    },
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    LengthExceedsParent {
        code: u8,
        declared: u8,
        available: usize,
    },
    UnknownAttribute {
        code: u8,
        length: u8,
    },
    MalformedAttribute {
        code: u8,
        length: u8,
        reason: String,
    },
    RecursionLimitExceeded {
        code: u8,
        depth: u32,
        max_depth: u32,
    },
    TrailingGarbage {
        length: usize,
    },
    // LSP header
    InvalidHeader {
        reason: String,
    },
    ChecksumMismatch {
        expected: u16,
        computed: u16,
    },
}

// ===== impl ReadError =====

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds {
                offset,
                length,
                limit,
            } => {
                write!(
                    f,
                    "read of {} byte(s) at offset {} exceeds limit {}",
                    length, offset, limit
                )
            }
        }
    }
}

impl std::error::Error for ReadError {}

// ===== impl Diagnostic =====

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, range: Range<usize>) -> Self {
        Diagnostic {
            severity: kind.severity(),
            range,
            kind,
        }
    }

    // Log diagnostic using the tracing API.
    pub(crate) fn log(&self) {
        let start = self.range.start;
        let end = self.range.end;
        match self.severity {
            Severity::Error | Severity::Warning => {
                warn!(%start, %end, severity = ?self.severity, "{}", self.kind);
            }
            Severity::Note => {
                debug!(%start, %end, "{}", self.kind);
            }
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}..{}] {}",
            self.range.start, self.range.end, self.kind
        )
    }
}

// ===== impl DiagnosticKind =====

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnknownAttribute { .. } => Severity::Note,
            DiagnosticKind::MalformedAttribute { .. }
            | DiagnosticKind::TrailingGarbage { .. }
            | DiagnosticKind::ChecksumMismatch { .. } => Severity::Warning,
            DiagnosticKind::OutOfBounds { .. }
            | DiagnosticKind::Truncated { .. }
            | DiagnosticKind::LengthExceedsParent { .. }
            | DiagnosticKind::RecursionLimitExceeded { .. }
            | DiagnosticKind::InvalidHeader { .. } => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::OutOfBounds { offset, length } => {
                write!(
                    f,
                    "read of {} byte(s) at offset {} is out of bounds",
                    length, offset
                )
            }
            DiagnosticKind::Truncated {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated at offset {} ({} vs {})",
                    offset, needed, available
                )
            }
            DiagnosticKind::LengthExceedsParent {
                code,
                declared,
                available,
            } => {
                write!(
                    f,
                    "short CLV header (t={}, {} vs {})",
                    code, declared, available
                )
            }
            DiagnosticKind::UnknownAttribute { code, length } => {
                write!(f, "unknown code (t={}, l={})", code, length)
            }
            DiagnosticKind::MalformedAttribute {
                code,
                length,
                reason,
            } => {
                write!(
                    f,
                    "malformed code (t={}, l={}): {}",
                    code, length, reason
                )
            }
            DiagnosticKind::RecursionLimitExceeded {
                code,
                depth,
                max_depth,
            } => {
                write!(
                    f,
                    "nesting limit reached in code {} (depth {} of {})",
                    code, depth, max_depth
                )
            }
            DiagnosticKind::TrailingGarbage { length } => {
                write!(f, "{} trailing byte(s) after last record", length)
            }
            DiagnosticKind::InvalidHeader { reason } => {
                write!(f, "invalid header: {}", reason)
            }
            DiagnosticKind::ChecksumMismatch { expected, computed } => {
                write!(
                    f,
                    "checksum incorrect (0x{:04x}, should be 0x{:04x})",
                    expected, computed
                )
            }
        }
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::fmt::Display;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostic, ReadResult, Severity};
use crate::reader::BoundedReader;

/// A labeled field covering a byte range of the decoded frame.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct FieldNode {
    pub label: String,
    pub range: Range<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldNode>,
}

/// Result of decoding one PDU.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DecodeOutput {
    pub root: FieldNode,
    pub diagnostics: Vec<Diagnostic>,
}

// ===== impl FieldNode =====

impl FieldNode {
    pub fn new(label: impl Into<String>, range: Range<usize>) -> Self {
        FieldNode {
            label: label.into(),
            range,
            value: None,
            children: vec![],
        }
    }

    pub fn leaf(
        label: impl Into<String>,
        range: Range<usize>,
        value: impl Display,
    ) -> Self {
        FieldNode {
            label: label.into(),
            range,
            value: Some(value.to_string()),
            children: vec![],
        }
    }

    pub fn add_leaf(
        &mut self,
        label: impl Into<String>,
        range: Range<usize>,
        value: impl Display,
    ) -> &mut FieldNode {
        self.push(FieldNode::leaf(label, range, value))
    }

    pub fn add_subtree(
        &mut self,
        label: impl Into<String>,
        range: Range<usize>,
    ) -> &mut FieldNode {
        self.push(FieldNode::new(label, range))
    }

    /// Appends an already built node and returns a reference to it.
    pub fn push(&mut self, node: FieldNode) -> &mut FieldNode {
        self.children.push(node);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Reads a value using `get`, records it as a leaf covering the bytes
    /// consumed, and hands it back to the caller.
    pub fn add_field<T: Display>(
        &mut self,
        label: impl Into<String>,
        buf: &mut BoundedReader,
        get: fn(&mut BoundedReader) -> ReadResult<T>,
    ) -> ReadResult<T> {
        let start = buf.position();
        let value = get(buf)?;
        self.add_leaf(label, start..buf.position(), &value);
        Ok(value)
    }

    pub fn set_value(&mut self, value: impl Display) {
        self.value = Some(value.to_string());
    }

    /// Appends text to the node label, the way summaries are shown on the
    /// subtree header.
    pub fn append_text(&mut self, text: impl Display) {
        self.label.push_str(&text.to_string());
    }

    /// Returns the first direct child with the given label prefix.
    pub fn child(&self, label: &str) -> Option<&FieldNode> {
        self.children
            .iter()
            .find(|child| child.label.starts_with(label))
    }

    /// Returns the first node in depth-first order whose label starts with
    /// the given prefix.
    pub fn find(&self, label: &str) -> Option<&FieldNode> {
        self.iter().find(|node| node.label.starts_with(label))
    }

    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &FieldNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

// ===== impl DecodeOutput =====

impl DecodeOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }
}

// ===== global functions =====

// Renders raw bytes the way opaque values are displayed.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Visitors for traversal coverage tests

use sqlexpr_ast::{Datum, ExprNode, Visitor};

const SENTINEL_TEXT: &str = "\u{0}sentinel";

/// A leaf recognised by [`CheckVisitor`]
///
/// Plant it in every child slot of a node to count how many slots the
/// traversal reaches.
pub fn sentinel() -> ExprNode {
    ExprNode::value(Datum::String(SENTINEL_TEXT.to_string()))
}

pub fn is_sentinel(node: &ExprNode) -> bool {
    match node {
        ExprNode::Value(v) => matches!(&v.datum, Datum::String(s) if s == SENTINEL_TEXT),
        _ => false,
    }
}

/// Counts enter/leave calls on sentinels and skips their children
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckVisitor {
    pub enter_count: usize,
    pub leave_count: usize,
}

impl Visitor for CheckVisitor {
    fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
        if is_sentinel(&node) {
            self.enter_count += 1;
            return (node, true);
        }
        (node, false)
    }

    fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
        if is_sentinel(&node) {
            self.leave_count += 1;
        }
        (node, true)
    }
}

/// Records the kind of every node entered and left
#[derive(Debug, Default, Clone)]
pub struct TraceVisitor {
    pub entered: Vec<&'static str>,
    pub left: Vec<&'static str>,
}

impl Visitor for TraceVisitor {
    fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
        self.entered.push(node.kind_name());
        (node, false)
    }

    fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
        self.left.push(node.kind_name());
        (node, true)
    }
}

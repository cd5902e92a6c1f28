// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Traversal
//!
//! Depth-first, pre/post-order traversal with in-place rewriting.
//!
//! ## Protocol
//!
//! For every node reached, [`ExprNode::accept`]:
//!
//! 1. calls [`Visitor::enter`], which may return a replacement node and a
//!    `skip_children` flag;
//! 2. unless children are skipped, accepts each child of the (possibly
//!    replaced) node in declared order, storing every child's result back
//!    into its slot before moving on;
//! 3. calls [`Visitor::leave`], whose result becomes the return value.
//!
//! A `false` from a child's `accept` stops the parent's remaining
//! children; the parent returns itself with `false` and does not call
//! `leave`. That lets a visitor abort the whole walk from `leave`.
//!
//! Each visited node receives exactly one `enter` and one `leave`, and a
//! node whose children are skipped receives its own pair and nothing for
//! its descendants.
//!
//! ## Example
//!
//! ```rust
//! use sqlexpr_ast::{BinaryOp, ExprNode, Visitor};
//!
//! /// Replaces every `NULL` literal with `0`
//! struct NullToZero;
//!
//! impl Visitor for NullToZero {
//!     fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
//!         if node == ExprNode::null() {
//!             return (ExprNode::int(0), true);
//!         }
//!         (node, true)
//!     }
//! }
//!
//! let tree = ExprNode::binary(BinaryOp::Plus, ExprNode::null(), ExprNode::int(1));
//! let (tree, ok) = tree.accept(&mut NullToZero);
//! assert!(ok);
//! assert_eq!(tree.restore_sql().unwrap(), "0+1");
//! ```

use tracing::{trace, warn};

use crate::config::AstConfig;
use crate::error::{AstError, AstResult};
use crate::expr::ExprNode;

/// Pre/post-order callbacks driven by [`ExprNode::accept`]
pub trait Visitor {
    /// Called before a node's children.
    ///
    /// Returns the node to continue with and whether to skip its children.
    fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
        (node, false)
    }

    /// Called after a node's children.
    ///
    /// Returns the node to store in the parent's slot and whether the walk
    /// should continue.
    fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
        (node, true)
    }
}

/// Accept the node in `slot` and store the result back
fn walk<V: Visitor + ?Sized>(slot: &mut ExprNode, v: &mut V) -> bool {
    let (node, ok) = std::mem::take(slot).accept(v);
    *slot = node;
    ok
}

fn walk_opt<V: Visitor + ?Sized>(slot: &mut Option<Box<ExprNode>>, v: &mut V) -> bool {
    match slot {
        Some(node) => walk(node, v),
        None => true,
    }
}

fn walk_all<V: Visitor + ?Sized>(slots: &mut [ExprNode], v: &mut V) -> bool {
    slots.iter_mut().all(|slot| walk(slot, v))
}

impl ExprNode {
    /// Traverse this tree with `v`.
    ///
    /// Returns the (possibly replaced) root and `false` if the walk was
    /// stopped by a `leave` returning `false`.
    pub fn accept<V: Visitor + ?Sized>(self, v: &mut V) -> (ExprNode, bool) {
        let (node, skip_children) = v.enter(self);
        if skip_children {
            return v.leave(node);
        }
        let (node, ok) = node.accept_children(v);
        if !ok {
            return (node, false);
        }
        v.leave(node)
    }

    /// Traverse like [`accept`](Self::accept), refusing trees deeper than
    /// `config.max_depth`.
    ///
    /// The depth is measured without recursion before anything is visited,
    /// so a rejected tree is never visited. It is torn down with
    /// [`ExprNode::dismantle`] so dropping it cannot overflow the stack.
    pub fn checked_accept<V: Visitor + ?Sized>(
        self,
        v: &mut V,
        config: &AstConfig,
    ) -> AstResult<(ExprNode, bool)> {
        let depth = self.depth();
        if depth > config.max_depth {
            warn!(
                "Refusing to traverse {}: depth {} exceeds limit {}",
                self.kind_name(),
                depth,
                config.max_depth
            );
            self.dismantle();
            return Err(AstError::TreeTooDeep {
                depth,
                limit: config.max_depth,
            });
        }
        trace!("Traversing {} (depth {})", self.kind_name(), depth);
        let (node, ok) = self.accept(v);
        if !ok {
            trace!("Traversal stopped early at {}", node.kind_name());
        }
        Ok((node, ok))
    }

    fn accept_children<V: Visitor + ?Sized>(mut self, v: &mut V) -> (ExprNode, bool) {
        let ok = match &mut self {
            ExprNode::BinaryOperation(n) => walk(&mut n.l, v) && walk(&mut n.r, v),
            ExprNode::UnaryOperation(n) => walk(&mut n.v, v),
            ExprNode::Between(n) => {
                walk(&mut n.expr, v) && walk(&mut n.left, v) && walk(&mut n.right, v)
            }
            ExprNode::Case(n) => {
                walk_opt(&mut n.value, v)
                    && walk_all(&mut n.when_clauses, v)
                    && walk_opt(&mut n.else_clause, v)
            }
            ExprNode::WhenClause(n) => walk(&mut n.expr, v) && walk(&mut n.result, v),
            ExprNode::PatternIn(n) => {
                walk(&mut n.expr, v) && walk_all(&mut n.list, v) && walk_opt(&mut n.sel, v)
            }
            ExprNode::PatternLike(n) => walk(&mut n.expr, v) && walk(&mut n.pattern, v),
            ExprNode::PatternRegexp(n) => walk(&mut n.expr, v) && walk(&mut n.pattern, v),
            ExprNode::IsNull(n) => walk(&mut n.expr, v),
            ExprNode::IsTruth(n) => walk(&mut n.expr, v),
            ExprNode::Parentheses(n) => walk(&mut n.expr, v),
            ExprNode::CompareSubquery(n) => walk(&mut n.l, v) && walk(&mut n.r, v),
            ExprNode::ExistsSubquery(n) => walk(&mut n.sel, v),
            ExprNode::Position(n) => walk_opt(&mut n.p, v),
            ExprNode::Variable(n) => walk_opt(&mut n.value, v),
            ExprNode::Values(n) => walk(&mut n.column, v),
            ExprNode::Row(n) => walk_all(&mut n.values, v),
            ExprNode::Subquery(_)
            | ExprNode::ColumnName(_)
            | ExprNode::Default(_)
            | ExprNode::ParamMarker(_)
            | ExprNode::Value(_) => true,
        };
        (self, ok)
    }
}

struct Rewriter<F>(F);

impl<F: FnMut(ExprNode) -> ExprNode> Visitor for Rewriter<F> {
    fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
        ((self.0)(node), true)
    }
}

/// Rewrite a tree bottom-up: `f` receives every node after its children
/// have been rewritten, and its result replaces the node.
pub fn rewrite<F>(node: ExprNode, f: F) -> ExprNode
where
    F: FnMut(ExprNode) -> ExprNode,
{
    node.accept(&mut Rewriter(f)).0
}

/// Invoke `f` on every node in pre-order without modifying the tree.
///
/// Uses an explicit stack, so it is safe on arbitrarily deep trees.
pub fn inspect<'a, F>(node: &'a ExprNode, mut f: F)
where
    F: FnMut(&'a ExprNode),
{
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        f(node);
        stack.extend(node.children().into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Datum;
    use crate::expr::{ColumnName, WhenClause};
    use crate::opcode::{BinaryOp, UnaryOp};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
            self.events.push(format!("enter {}", node.kind_name()));
            (node, false)
        }

        fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
            self.events.push(format!("leave {}", node.kind_name()));
            (node, true)
        }
    }

    #[test]
    fn test_pre_and_post_order() {
        let tree = ExprNode::unary(
            UnaryOp::Minus,
            ExprNode::column(ColumnName::new("a")),
        );
        let mut rec = Recorder::default();
        let (_, ok) = tree.accept(&mut rec);
        assert!(ok);
        assert_eq!(
            rec.events,
            vec![
                "enter UnaryOperationExpr",
                "enter ColumnNameExpr",
                "leave ColumnNameExpr",
                "leave UnaryOperationExpr",
            ]
        );
    }

    #[test]
    fn test_leave_false_stops_siblings() {
        struct StopAtFirstLeaf(usize);

        impl Visitor for StopAtFirstLeaf {
            fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
                self.0 += 1;
                (node, false)
            }
        }

        let tree = ExprNode::between(ExprNode::int(1), ExprNode::int(2), ExprNode::int(3), false);
        let mut v = StopAtFirstLeaf(0);
        let (tree, ok) = tree.accept(&mut v);
        assert!(!ok);
        assert_eq!(v.0, 1);
        assert_eq!(tree.kind_name(), "BetweenExpr");
    }

    #[test]
    fn test_enter_replacement_with_skip_is_kept() {
        struct WrapInParens;

        impl Visitor for WrapInParens {
            fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
                match node {
                    ExprNode::Value(_) => (ExprNode::paren(node), true),
                    other => (other, false),
                }
            }
        }

        let tree = ExprNode::binary(BinaryOp::Mul, ExprNode::int(2), ExprNode::int(3));
        let (tree, ok) = tree.accept(&mut WrapInParens);
        assert!(ok);
        assert_eq!(tree.restore_sql().unwrap(), "(2)*(3)");
    }

    #[test]
    fn test_enter_replacement_children_are_visited() {
        /// Expands column `x` into `1+2` and records every callback
        #[derive(Default)]
        struct Expand {
            events: Vec<String>,
        }

        impl Visitor for Expand {
            fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
                let node = match node {
                    ExprNode::ColumnName(c) if c.name.name == "x" => {
                        ExprNode::binary(BinaryOp::Plus, ExprNode::int(1), ExprNode::int(2))
                    }
                    other => other,
                };
                self.events.push(format!("enter {}", node.kind_name()));
                (node, false)
            }

            fn leave(&mut self, node: ExprNode) -> (ExprNode, bool) {
                self.events.push(format!("leave {}", node.kind_name()));
                (node, true)
            }
        }

        let tree = ExprNode::unary(UnaryOp::Minus, ExprNode::column(ColumnName::new("x")));
        let mut v = Expand::default();
        let (tree, ok) = tree.accept(&mut v);
        assert!(ok);
        assert_eq!(
            v.events,
            vec![
                "enter UnaryOperationExpr",
                "enter BinaryOperationExpr",
                "enter ValueExpr",
                "leave ValueExpr",
                "enter ValueExpr",
                "leave ValueExpr",
                "leave BinaryOperationExpr",
                "leave UnaryOperationExpr",
            ]
        );
        assert_eq!(tree.restore_sql().unwrap(), "-1+2");
    }

    #[test]
    fn test_rewrite_folds_bottom_up() {
        let tree = ExprNode::binary(
            BinaryOp::Plus,
            ExprNode::binary(BinaryOp::Plus, ExprNode::int(1), ExprNode::int(2)),
            ExprNode::int(3),
        );
        let folded = rewrite(tree, |node| {
            if let ExprNode::BinaryOperation(b) = &node {
                if let (ExprNode::Value(l), ExprNode::Value(r)) = (&*b.l, &*b.r) {
                    if let (Datum::Int(x), Datum::Int(y)) = (&l.datum, &r.datum) {
                        return ExprNode::int(x + y);
                    }
                }
            }
            node
        });
        assert_eq!(folded, ExprNode::int(6));
    }

    #[test]
    fn test_rewrite_inside_case_when() {
        let tree = ExprNode::Case(crate::expr::CaseExpr::new(
            None,
            vec![WhenClause::new(ExprNode::null(), ExprNode::int(1))],
            None,
        ));
        let rewritten = rewrite(tree, |node| {
            if node == ExprNode::null() {
                ExprNode::value(true)
            } else {
                node
            }
        });
        assert_eq!(rewritten.restore_sql().unwrap(), "CASE WHEN TRUE THEN 1 END");
    }

    #[test]
    fn test_inspect_pre_order() {
        let tree = ExprNode::in_list(
            ExprNode::column(ColumnName::new("a")),
            vec![ExprNode::int(1), ExprNode::int(2)],
            false,
        );
        let mut kinds = Vec::new();
        inspect(&tree, |n| kinds.push(n.kind_name()));
        assert_eq!(
            kinds,
            vec!["PatternInExpr", "ColumnNameExpr", "ValueExpr", "ValueExpr"]
        );
    }

    #[test]
    fn test_checked_accept_rejects_deep_tree() {
        let mut tree = ExprNode::int(1);
        for _ in 0..10 {
            tree = ExprNode::unary(UnaryOp::Minus, tree);
        }
        let config = AstConfig::default().with_max_depth(5);
        let err = tree.checked_accept(&mut Recorder::default(), &config).unwrap_err();
        assert_eq!(err, AstError::TreeTooDeep { depth: 11, limit: 5 });
    }

    #[test]
    fn test_checked_accept_rejects_very_deep_tree() {
        let mut tree = ExprNode::int(1);
        for _ in 0..300_000 {
            tree = ExprNode::unary(UnaryOp::Minus, tree);
        }
        let mut rec = Recorder::default();
        let err = tree.checked_accept(&mut rec, &AstConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AstError::TreeTooDeep {
                depth: 300_001,
                limit: 1000
            }
        );
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_checked_accept_within_limit() {
        let tree = ExprNode::is_null(ExprNode::int(1), false);
        let mut rec = Recorder::default();
        let (tree, ok) = tree
            .checked_accept(&mut rec, &AstConfig::default().with_max_depth(2))
            .unwrap();
        assert!(ok);
        assert_eq!(rec.events.len(), 4);
        assert_eq!(tree.kind_name(), "IsNullExpr");
    }
}

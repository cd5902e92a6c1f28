// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Expression AST
//!
//! This crate provides the expression tree of a SQL front end together with
//! the two passes every consumer needs:
//!
//! - **Traversal**: a pre/post-order [`Visitor`] protocol that can inspect
//!   the tree, skip subtrees, and replace nodes in place
//! - **Restore**: rendering any subtree back to one canonical SQL spelling,
//!   used for logging, plan-cache keys and statement rewriting
//!
//! ## Pipeline
//!
//! ```text
//! Parser → ExprNode tree → Visitor passes (rewrite / inspect) → Restore → SQL text
//! ```
//!
//! Parsing, type analysis and statement-level nodes live outside this crate.

pub mod config;
pub mod driver;
pub mod error;
pub mod expr;
pub mod opcode;
pub mod restore;
pub mod visitor;

// Re-export commonly used types
pub use config::AstConfig;
pub use driver::{Datum, ValueExpr};
pub use error::{AstError, AstResult, ErrorSeverity};
pub use expr::{
    BetweenExpr, BinaryOperationExpr, CaseExpr, ColumnName, ColumnNameExpr, CompareSubqueryExpr,
    DefaultExpr, ExistsSubqueryExpr, ExprNode, IsNullExpr, IsTruthExpr, ParamMarkerExpr,
    ParenthesesExpr, PatternInExpr, PatternLikeExpr, PatternRegexpExpr, PositionExpr, RowExpr,
    SubqueryExpr, UnaryOperationExpr, ValuesExpr, VariableExpr, WhenClause,
};
pub use opcode::{BinaryOp, UnaryOp};
pub use restore::{restore, restore_with, Restore, RestoreCtx};
pub use visitor::{inspect, rewrite, Visitor};

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sqlexpr
//!
//! This crate provides the conformance harness for the expression AST:
//! - A small expression parser that builds trees from MySQL text
//! - YAML restore suites and a runner that checks canonical output
//! - Visitors for traversal coverage tests
//! - Expression-specific assertions

pub mod assertions;
pub mod cases;
pub mod error;
pub mod harness;
pub mod lexer;
pub mod parser;
pub mod visitors;

// Re-exports for convenience
pub use assertions::ExprAssertions;
pub use cases::{builtin_suites, load_suites, parse_suites, Extract, RestoreCase, RestoreSuite};
pub use error::{HarnessError, HarnessResult};
pub use harness::run_node_restore_test;
pub use parser::parse_expr;
pub use visitors::{is_sentinel, sentinel, CheckVisitor, TraceVisitor};

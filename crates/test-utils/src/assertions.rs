// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression-specific test helpers and custom assertions

use sqlexpr_ast::{Datum, ExprNode};

/// Custom assertion helpers for expression trees
pub struct ExprAssertions;

impl ExprAssertions {
    /// Assert that an expression is a column reference with the given name
    pub fn assert_column_ref(expr: &ExprNode, name: &str) {
        match expr {
            ExprNode::ColumnName(col) => {
                assert_eq!(
                    col.name.name, name,
                    "Expected column '{}', found '{}'",
                    name, col.name.name
                );
            }
            _ => panic!("Expected ColumnNameExpr, found {:?}", expr),
        }
    }

    /// Assert that an expression is an integer literal with the given value
    pub fn assert_literal_int(expr: &ExprNode, value: i64) {
        match expr {
            ExprNode::Value(v) => match &v.datum {
                Datum::Int(i) => assert_eq!(*i, value, "Expected integer {}, found {}", value, i),
                other => panic!("Expected integer literal, found {:?}", other),
            },
            _ => panic!("Expected ValueExpr, found {:?}", expr),
        }
    }

    /// Assert that an expression is a string literal
    pub fn assert_literal_string(expr: &ExprNode, value: &str) {
        match expr {
            ExprNode::Value(v) => match &v.datum {
                Datum::String(s) => {
                    assert_eq!(s, value, "Expected string '{}', found '{}'", value, s)
                }
                other => panic!("Expected string literal, found {:?}", other),
            },
            _ => panic!("Expected ValueExpr, found {:?}", expr),
        }
    }

    /// Assert the node's shape by kind name
    pub fn assert_kind(expr: &ExprNode, kind: &str) {
        assert_eq!(expr.kind_name(), kind, "Unexpected node kind: {:?}", expr);
    }

    /// Assert that an expression restores to exactly `expected`
    pub fn assert_restores_to(expr: &ExprNode, expected: &str) {
        match expr.restore_sql() {
            Ok(sql) => assert_eq!(sql, expected, "Restored text mismatch"),
            Err(e) => panic!("Failed to restore {}: {}", expr.kind_name(), e),
        }
    }

    /// Assert that restoring fails
    pub fn assert_restore_fails(expr: &ExprNode) {
        if let Ok(sql) = expr.restore_sql() {
            panic!("Expected restore of {} to fail, got {:?}", expr.kind_name(), sql);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlexpr_ast::{BinaryOp, ColumnName};

    #[test]
    fn test_assert_column_ref() {
        let expr = ExprNode::column(ColumnName::new("id").with_table("users"));
        ExprAssertions::assert_column_ref(&expr, "id");
    }

    #[test]
    #[should_panic(expected = "Expected column")]
    fn test_assert_column_ref_fails() {
        let expr = ExprNode::column(ColumnName::new("id"));
        ExprAssertions::assert_column_ref(&expr, "name");
    }

    #[test]
    fn test_assert_literals() {
        ExprAssertions::assert_literal_int(&ExprNode::int(42), 42);
        ExprAssertions::assert_literal_string(&ExprNode::string("hi"), "hi");
    }

    #[test]
    fn test_assert_restores_to() {
        let expr = ExprNode::binary(BinaryOp::Ne, ExprNode::string("a"), ExprNode::int(1));
        ExprAssertions::assert_kind(&expr, "BinaryOperationExpr");
        ExprAssertions::assert_restores_to(&expr, "'a'!=1");
        ExprAssertions::assert_restore_fails(&ExprNode::subquery(""));
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for traversal and restore

use serde::Serialize;

/// Result type alias for AST operations
pub type AstResult<T> = Result<T, AstError>;

/// Errors that can occur while traversing or restoring an expression tree
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum AstError {
    /// A child slot holds a node of the wrong shape
    #[error("Shape violation in {node}: expected '{expected}', found '{found}'")]
    ShapeViolation {
        node: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A child the node's shape requires is absent
    #[error("Missing required child in {node}: {child}")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },

    /// The tree is nested deeper than the configured limit
    #[error("Expression tree too deep (depth: {depth}, limit: {limit})")]
    TreeTooDeep { depth: usize, limit: usize },

    /// A literal that has no canonical SQL spelling
    #[error("Invalid literal value {value}: {reason}")]
    InvalidLiteral { value: String, reason: String },

    /// An operator spelling that maps to no known operator
    #[error("Unknown operator: {0}")]
    InvalidOperator(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AstError {
    /// Check if retrying with a different configuration could succeed
    ///
    /// Only the depth limit is configurable; every other error is a
    /// property of the tree itself and fails identically on every run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AstError::TreeTooDeep { .. })
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AstError::ShapeViolation { .. } => ErrorSeverity::Defect,
            AstError::MissingChild { .. } => ErrorSeverity::Defect,
            AstError::TreeTooDeep { .. } => ErrorSeverity::ResourceExhausted,
            AstError::InvalidLiteral { .. } => ErrorSeverity::Defect,
            AstError::InvalidOperator(_) => ErrorSeverity::Input,
            AstError::InvalidConfig(_) => ErrorSeverity::Input,
        }
    }
}

/// Severity level for AST errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Bad caller input (operator spelling, config)
    Input,
    /// The host limit was reached before the tree was processed
    ResourceExhausted,
    /// The tree violates its shape contract
    Defect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_shape_violation() {
        let err = AstError::ShapeViolation {
            node: "CaseExpr",
            expected: "WhenClause",
            found: "ValueExpr",
        };
        assert_eq!(
            err.to_string(),
            "Shape violation in CaseExpr: expected 'WhenClause', found 'ValueExpr'"
        );
    }

    #[test]
    fn test_error_display_too_deep() {
        let err = AstError::TreeTooDeep {
            depth: 12,
            limit: 10,
        };
        assert!(err.to_string().contains("depth: 12"));
        assert!(err.to_string().contains("limit: 10"));
    }

    #[test]
    fn test_recoverable() {
        assert!(AstError::TreeTooDeep { depth: 2, limit: 1 }.is_recoverable());
        assert!(!AstError::InvalidOperator("<>>".into()).is_recoverable());
        assert!(
            !AstError::MissingChild {
                node: "PositionExpr",
                child: "P"
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Defect > ErrorSeverity::Input);
        assert_eq!(
            AstError::TreeTooDeep { depth: 2, limit: 1 }.severity(),
            ErrorSeverity::ResourceExhausted
        );
    }

    #[test]
    fn test_error_serializes() {
        let err = AstError::InvalidOperator("=>".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"InvalidOperator":"=>"}"#);
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Harness errors

use sqlexpr_ast::AstError;
use thiserror::Error;

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised while building trees from text or loading cases
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid case file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    #[error("Restore mismatch for {input:?}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        input: String,
        expected: String,
        actual: String,
    },

    #[error("No {wanted} in {input:?}")]
    Extract { wanted: &'static str, input: String },

    #[error(transparent)]
    Ast(#[from] AstError),
}

impl HarnessError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        HarnessError::Syntax {
            offset,
            message: message.into(),
        }
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # AST Configuration
//!
//! Limits shared by checked traversal and restore.
//!
//! ## Example
//!
//! ```rust
//! use sqlexpr_ast::AstConfig;
//!
//! let config = AstConfig::from_json(r#"{ "max_depth": 64 }"#).unwrap();
//! assert_eq!(config.max_depth, 64);
//!
//! let config = AstConfig::default().with_max_depth(16);
//! assert_eq!(config.max_depth, 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AstError, AstResult};

/// Default nesting limit for traversal and restore
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Configuration for traversal and restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstConfig {
    /// Maximum nesting depth of an expression tree.
    ///
    /// A tree made of a single leaf has depth 1.
    pub max_depth: usize,
}

impl Default for AstConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AstConfig {
    /// Create a config with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a config from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> AstResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AstError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> AstResult<()> {
        if self.max_depth == 0 {
            return Err(AstError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

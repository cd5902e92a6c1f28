// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Restore case suites
//!
//! Suites are YAML lists. Each suite names the node it targets, an optional
//! template wrapping every input (`%s` marks the hole), and an optional
//! extraction telling the harness which node of the parsed template to
//! restore.
//!
//! ```yaml
//! - name: when_clause
//!   template: "case %s end"
//!   extract: first_when_clause
//!   cases:
//!     - { input: "when 1 then 2", expected: "WHEN 1 THEN 2" }
//! ```

use std::path::Path;

use serde::Deserialize;
use sqlexpr_ast::ExprNode;

use crate::error::HarnessResult;
use crate::harness::run_node_restore_test;

/// Cases shipped with the crate
const BUILTIN_SUITES: &str = include_str!("../fixtures/restore_cases.yaml");

/// One input and the canonical text it must restore to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreCase {
    pub input: String,
    pub expected: String,
}

impl RestoreCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
        }
    }
}

/// Which node of the parsed template to restore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extract {
    /// The whole parsed expression
    #[default]
    Root,
    /// The first WHEN clause of a CASE root
    FirstWhenClause,
    /// The first value of a ROW root
    FirstRowValue,
}

impl Extract {
    /// Pull the target node out of `tree`
    pub fn apply(self, tree: ExprNode) -> Option<ExprNode> {
        match (self, tree) {
            (Extract::Root, tree) => Some(tree),
            (Extract::FirstWhenClause, ExprNode::Case(case)) => {
                case.when_clauses.into_iter().next()
            }
            (Extract::FirstRowValue, ExprNode::Row(row)) => row.values.into_iter().next(),
            _ => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Extract::Root => "expression",
            Extract::FirstWhenClause => "WHEN clause",
            Extract::FirstRowValue => "row value",
        }
    }
}

/// A named group of cases sharing a template and extraction
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreSuite {
    pub name: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub extract: Extract,
    pub cases: Vec<RestoreCase>,
}

impl RestoreSuite {
    pub fn template(&self) -> &str {
        self.template.as_deref().unwrap_or("%s")
    }

    /// Run every case in the suite, stopping at the first failure
    pub fn run(&self) -> HarnessResult<()> {
        let extract = self.extract;
        run_node_restore_test(&self.cases, self.template(), |tree| extract.apply(tree))
    }
}

/// Parse suites from YAML text
pub fn parse_suites(content: &str) -> HarnessResult<Vec<RestoreSuite>> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load suites from a YAML file
pub fn load_suites(path: &Path) -> HarnessResult<Vec<RestoreSuite>> {
    let content = std::fs::read_to_string(path)?;
    parse_suites(&content)
}

/// The suites bundled with this crate
pub fn builtin_suites() -> HarnessResult<Vec<RestoreSuite>> {
    parse_suites(BUILTIN_SUITES)
}

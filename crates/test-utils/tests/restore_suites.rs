// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Runs the bundled restore suites, one test per node kind

use std::path::Path;

use sqlexpr_test_utils::{builtin_suites, load_suites, RestoreSuite};

fn suite(name: &str) -> RestoreSuite {
    builtin_suites()
        .expect("Failed to load bundled suites")
        .into_iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("No suite named {}", name))
}

fn run(name: &str) {
    let suite = suite(name);
    if let Err(e) = suite.run() {
        panic!("Suite {} failed: {}", name, e);
    }
}

#[test]
fn test_unary_operation_restore() {
    run("unary_operation");
}

#[test]
fn test_column_name_restore() {
    run("column_name");
}

#[test]
fn test_is_null_restore() {
    run("is_null");
}

#[test]
fn test_is_truth_restore() {
    run("is_truth");
}

#[test]
fn test_between_restore() {
    run("between");
}

#[test]
fn test_case_restore() {
    run("case");
}

#[test]
fn test_binary_operation_restore() {
    run("binary_operation");
}

#[test]
fn test_parentheses_restore() {
    run("parentheses");
}

#[test]
fn test_when_clause_restore() {
    run("when_clause");
}

#[test]
fn test_default_restore() {
    run("default");
}

#[test]
fn test_pattern_restore() {
    run("pattern_in");
    run("pattern_like");
    run("pattern_regexp");
}

#[test]
fn test_subquery_restore() {
    run("subquery");
}

#[test]
fn test_variable_restore() {
    run("variable");
}

#[test]
fn test_param_values_row_restore() {
    run("param_marker");
    run("values");
    run("row");
    run("row_value");
}

#[test]
fn test_literal_restore() {
    run("literal");
}

#[test]
fn test_every_bundled_suite_passes() {
    let suites = builtin_suites().expect("Failed to load bundled suites");
    assert!(suites.len() >= 15, "Expected the full bundled set");
    for suite in &suites {
        assert!(!suite.cases.is_empty(), "Suite {} has no cases", suite.name);
        if let Err(e) = suite.run() {
            panic!("Suite {} failed: {}", suite.name, e);
        }
    }
}

#[test]
fn test_load_suites_from_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/restore_cases.yaml");
    let from_file = load_suites(&path).expect("Failed to read fixture file");
    let bundled = builtin_suites().unwrap();
    assert_eq!(from_file.len(), bundled.len());
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Restore conformance runner

use sqlexpr_ast::{restore, ExprNode};
use tracing::debug;

use crate::cases::RestoreCase;
use crate::error::{HarnessError, HarnessResult};
use crate::parser::parse_expr;

/// Check that every case restores to its expected text.
///
/// For each case the input is substituted into `template` at `%s`, parsed,
/// and narrowed with `extract`. The extracted node must restore to
/// `expected`. The expected text is then fed through the same template and
/// must restore to itself, so canonical output is a fixed point.
pub fn run_node_restore_test<F>(
    cases: &[RestoreCase],
    template: &str,
    mut extract: F,
) -> HarnessResult<()>
where
    F: FnMut(ExprNode) -> Option<ExprNode>,
{
    for case in cases {
        let restored = restore_through(&case.input, template, &mut extract)?;
        if restored != case.expected {
            return Err(HarnessError::Mismatch {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: restored,
            });
        }

        let again = restore_through(&case.expected, template, &mut extract)?;
        if again != restored {
            return Err(HarnessError::Mismatch {
                input: case.expected.clone(),
                expected: restored,
                actual: again,
            });
        }
        debug!("Restored {:?} as {:?}", case.input, restored);
    }
    Ok(())
}

fn restore_through<F>(input: &str, template: &str, extract: &mut F) -> HarnessResult<String>
where
    F: FnMut(ExprNode) -> Option<ExprNode>,
{
    let text = template.replacen("%s", input, 1);
    let tree = parse_expr(&text)?;
    let node = extract(tree).ok_or_else(|| HarnessError::Extract {
        wanted: "target node",
        input: text.clone(),
    })?;
    Ok(restore(&node)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(tree: ExprNode) -> Option<ExprNode> {
        Some(tree)
    }

    #[test]
    fn test_passing_cases() {
        let cases = vec![
            RestoreCase::new("a<>5", "`a`!=5"),
            RestoreCase::new("(1+2)*3", "(1+2)*3"),
        ];
        run_node_restore_test(&cases, "%s", root).unwrap();
    }

    #[test]
    fn test_mismatch_is_reported() {
        let cases = vec![RestoreCase::new("a<>5", "`a`<>5")];
        let err = run_node_restore_test(&cases, "%s", root).unwrap_err();
        match err {
            HarnessError::Mismatch { actual, .. } => assert_eq!(actual, "`a`!=5"),
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_failure() {
        let cases = vec![RestoreCase::new("1", "1")];
        let err = run_node_restore_test(&cases, "%s", |_| None).unwrap_err();
        assert!(matches!(err, HarnessError::Extract { .. }));
    }

    #[test]
    fn test_parse_failure_propagates() {
        let cases = vec![RestoreCase::new("1 +", "1")];
        let err = run_node_restore_test(&cases, "%s", root).unwrap_err();
        assert!(matches!(err, HarnessError::UnexpectedEof(_)));
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module defines the closed set of SQL expression shapes.
//!
//! ## Design
//!
//! Every shape is a plain struct, and [`ExprNode`] is the sum of all of
//! them. A node owns its children exclusively (`Box` for single slots,
//! `Vec` for ordered lists, `Option` for optional slots), so a tree never
//! shares or aliases a subtree. Rewrites replace a child by overwriting
//! its slot; see [`crate::visitor`].
//!
//! Shapes carry no validation beyond their field types. Whether an
//! operator is legal for its operand types, or a literal fits its column,
//! belongs to semantic analysis.
//!
//! ## Child order
//!
//! Traversal visits children in the order the fields are declared below,
//! skipping only optional slots that are empty:
//!
//! | Shape                 | Children                          |
//! |-----------------------|-----------------------------------|
//! | `BinaryOperationExpr` | `l`, `r`                          |
//! | `UnaryOperationExpr`  | `v`                               |
//! | `BetweenExpr`         | `expr`, `left`, `right`           |
//! | `CaseExpr`            | `value`, `when_clauses`, `else_clause` |
//! | `WhenClause`          | `expr`, `result`                  |
//! | `PatternInExpr`       | `expr`, `list`, `sel`             |
//! | `PatternLikeExpr`     | `expr`, `pattern`                 |
//! | `PatternRegexpExpr`   | `expr`, `pattern`                 |
//! | `IsNullExpr`          | `expr`                            |
//! | `IsTruthExpr`         | `expr`                            |
//! | `ParenthesesExpr`     | `expr`                            |
//! | `CompareSubqueryExpr` | `l`, `r`                          |
//! | `ExistsSubqueryExpr`  | `sel`                             |
//! | `PositionExpr`        | `p`                               |
//! | `VariableExpr`        | `value`                           |
//! | `ValuesExpr`          | `column`                          |
//! | `RowExpr`             | `values`                          |
//!
//! `ColumnNameExpr`, `DefaultExpr`, `ParamMarkerExpr`, `SubqueryExpr` and
//! `ValueExpr` are leaves. [`ColumnName`] is a value object inside them,
//! not a node.
//!
//! ## Example
//!
//! ```rust
//! use sqlexpr_ast::{BinaryOp, ExprNode};
//!
//! // (1+2)*3
//! let sum = ExprNode::binary(BinaryOp::Plus, ExprNode::int(1), ExprNode::int(2));
//! let expr = ExprNode::binary(BinaryOp::Mul, ExprNode::paren(sum), ExprNode::int(3));
//! assert_eq!(expr.restore_sql().unwrap(), "(1+2)*3");
//! ```

use serde::{Deserialize, Serialize};

use crate::driver::{Datum, ValueExpr};
use crate::opcode::{BinaryOp, UnaryOp};

/// A SQL expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode {
    /// `l <op> r`
    BinaryOperation(BinaryOperationExpr),
    /// `<op>v`
    UnaryOperation(UnaryOperationExpr),
    /// `expr [NOT] BETWEEN left AND right`
    Between(BetweenExpr),
    /// `CASE [value] WHEN ... [ELSE ...] END`
    Case(CaseExpr),
    /// `WHEN expr THEN result`, only meaningful inside a CASE
    WhenClause(WhenClause),
    /// `expr [NOT] IN (list)` or `expr [NOT] IN (subquery)`
    PatternIn(PatternInExpr),
    /// `expr [NOT] LIKE pattern [ESCAPE c]`
    PatternLike(PatternLikeExpr),
    /// `expr [NOT] REGEXP pattern`
    PatternRegexp(PatternRegexpExpr),
    /// `expr IS [NOT] NULL`
    IsNull(IsNullExpr),
    /// `expr IS [NOT] TRUE|FALSE`
    IsTruth(IsTruthExpr),
    /// `(expr)`
    Parentheses(ParenthesesExpr),
    /// `l <op> ALL|ANY r`
    CompareSubquery(CompareSubqueryExpr),
    /// `[NOT] EXISTS sel`
    ExistsSubquery(ExistsSubqueryExpr),
    /// A parenthesized subquery owned by the statement layer
    Subquery(SubqueryExpr),
    /// Column reference
    ColumnName(ColumnNameExpr),
    /// `DEFAULT` or `DEFAULT(col)`
    Default(DefaultExpr),
    /// Positional reference, e.g. `ORDER BY 1`
    Position(PositionExpr),
    /// `?`
    ParamMarker(ParamMarkerExpr),
    /// `@var`, `@@var`, `@@GLOBAL.var`
    Variable(VariableExpr),
    /// `VALUES(col)`
    Values(ValuesExpr),
    /// `ROW(a, b, ...)`
    Row(RowExpr),
    /// Literal constant
    Value(ValueExpr),
}

impl Default for ExprNode {
    /// A `NULL` literal. Used as the transient filler while a slot's
    /// child is moved out for traversal.
    fn default() -> Self {
        ExprNode::Value(ValueExpr::null())
    }
}

/// Binary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperationExpr {
    pub op: BinaryOp,
    pub l: Box<ExprNode>,
    pub r: Box<ExprNode>,
}

/// Unary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperationExpr {
    pub op: UnaryOp,
    pub v: Box<ExprNode>,
}

/// BETWEEN predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetweenExpr {
    pub expr: Box<ExprNode>,
    pub left: Box<ExprNode>,
    pub right: Box<ExprNode>,
    pub not: bool,
}

/// CASE expression
///
/// `when_clauses` holds [`ExprNode::WhenClause`] entries. It is typed as
/// `ExprNode` so a visitor can replace an entry through the common
/// protocol; restore rejects any other shape in this list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    /// Subject of a simple CASE; `None` for a searched CASE
    pub value: Option<Box<ExprNode>>,
    pub when_clauses: Vec<ExprNode>,
    pub else_clause: Option<Box<ExprNode>>,
}

impl CaseExpr {
    pub fn new(
        value: Option<ExprNode>,
        when_clauses: Vec<WhenClause>,
        else_clause: Option<ExprNode>,
    ) -> Self {
        Self {
            value: value.map(Box::new),
            when_clauses: when_clauses
                .into_iter()
                .map(ExprNode::WhenClause)
                .collect(),
            else_clause: else_clause.map(Box::new),
        }
    }
}

/// WHEN branch of a CASE expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenClause {
    pub expr: Box<ExprNode>,
    pub result: Box<ExprNode>,
}

impl WhenClause {
    pub fn new(expr: ExprNode, result: ExprNode) -> Self {
        Self {
            expr: Box::new(expr),
            result: Box::new(result),
        }
    }
}

/// IN predicate
///
/// Either `list` or `sel` carries the candidates. Both are traversed when
/// present; restore prefers `sel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInExpr {
    pub expr: Box<ExprNode>,
    pub list: Vec<ExprNode>,
    pub sel: Option<Box<ExprNode>>,
    pub not: bool,
}

/// LIKE predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternLikeExpr {
    pub expr: Box<ExprNode>,
    pub pattern: Box<ExprNode>,
    pub not: bool,
    /// Escape character; `\` unless an ESCAPE clause was given
    pub escape: char,
}

/// Default LIKE escape character
pub const DEFAULT_LIKE_ESCAPE: char = '\\';

/// REGEXP predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRegexpExpr {
    pub expr: Box<ExprNode>,
    pub pattern: Box<ExprNode>,
    pub not: bool,
}

/// IS NULL predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNullExpr {
    pub expr: Box<ExprNode>,
    pub not: bool,
}

/// IS TRUE / IS FALSE predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsTruthExpr {
    pub expr: Box<ExprNode>,
    pub not: bool,
    /// `true` for `IS TRUE`, `false` for `IS FALSE`
    pub truth: bool,
}

/// Explicit parentheses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesesExpr {
    pub expr: Box<ExprNode>,
}

/// Comparison against a quantified subquery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSubqueryExpr {
    pub l: Box<ExprNode>,
    pub op: BinaryOp,
    pub r: Box<ExprNode>,
    /// `ALL` when set, `ANY` otherwise
    pub all: bool,
}

/// EXISTS predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsSubqueryExpr {
    pub sel: Box<ExprNode>,
    pub not: bool,
}

/// A subquery
///
/// Statement nodes live outside this crate, so the query body is held as
/// its already-restored text. Renders as `(<sql>)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubqueryExpr {
    pub sql: String,
}

/// Column name, up to `schema.table.column`
///
/// Leading parts are optional; a schema without a table is not a valid name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColumnName {
    pub schema: Option<String>,
    pub table: Option<String>,
    pub name: String,
}

impl ColumnName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: None,
            name: name.into(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Number of name parts present
    pub fn parts(&self) -> usize {
        1 + usize::from(self.table.is_some()) + usize::from(self.schema.is_some())
    }
}

/// Column reference leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNameExpr {
    pub name: ColumnName,
}

/// DEFAULT value reference
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultExpr {
    pub name: Option<ColumnName>,
}

/// Positional reference in ORDER BY / GROUP BY
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionExpr {
    /// 1-based position; unused when `p` is set
    pub n: usize,
    /// Parameter marker standing in for the position
    pub p: Option<Box<ExprNode>>,
}

/// `?` placeholder of a prepared statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamMarkerExpr {
    /// Byte offset of the marker in the source text
    pub offset: usize,
    /// 0-based ordinal among the statement's markers
    pub order: usize,
}

impl ParamMarkerExpr {
    pub fn new(offset: usize) -> Self {
        Self { offset, order: 0 }
    }
}

/// User or system variable reference
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariableExpr {
    pub name: String,
    pub is_global: bool,
    pub is_system: bool,
    /// Whether GLOBAL/SESSION was written out
    pub explicit_scope: bool,
    /// Assigned value for `@var := value`
    pub value: Option<Box<ExprNode>>,
}

/// `VALUES(col)` in ON DUPLICATE KEY UPDATE
///
/// `column` must hold an [`ExprNode::ColumnName`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesExpr {
    pub column: Box<ExprNode>,
}

/// Row constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowExpr {
    pub values: Vec<ExprNode>,
}

macro_rules! impl_from_variant {
    ($($shape:ident => $variant:ident),+ $(,)?) => {
        $(impl From<$shape> for ExprNode {
            fn from(node: $shape) -> Self {
                ExprNode::$variant(node)
            }
        })+
    };
}

impl_from_variant!(
    BinaryOperationExpr => BinaryOperation,
    UnaryOperationExpr => UnaryOperation,
    BetweenExpr => Between,
    CaseExpr => Case,
    WhenClause => WhenClause,
    PatternInExpr => PatternIn,
    PatternLikeExpr => PatternLike,
    PatternRegexpExpr => PatternRegexp,
    IsNullExpr => IsNull,
    IsTruthExpr => IsTruth,
    ParenthesesExpr => Parentheses,
    CompareSubqueryExpr => CompareSubquery,
    ExistsSubqueryExpr => ExistsSubquery,
    SubqueryExpr => Subquery,
    ColumnNameExpr => ColumnName,
    DefaultExpr => Default,
    PositionExpr => Position,
    ParamMarkerExpr => ParamMarker,
    VariableExpr => Variable,
    ValuesExpr => Values,
    RowExpr => Row,
    ValueExpr => Value,
);

impl ExprNode {
    /// Name of the node's shape, used in error reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprNode::BinaryOperation(_) => "BinaryOperationExpr",
            ExprNode::UnaryOperation(_) => "UnaryOperationExpr",
            ExprNode::Between(_) => "BetweenExpr",
            ExprNode::Case(_) => "CaseExpr",
            ExprNode::WhenClause(_) => "WhenClause",
            ExprNode::PatternIn(_) => "PatternInExpr",
            ExprNode::PatternLike(_) => "PatternLikeExpr",
            ExprNode::PatternRegexp(_) => "PatternRegexpExpr",
            ExprNode::IsNull(_) => "IsNullExpr",
            ExprNode::IsTruth(_) => "IsTruthExpr",
            ExprNode::Parentheses(_) => "ParenthesesExpr",
            ExprNode::CompareSubquery(_) => "CompareSubqueryExpr",
            ExprNode::ExistsSubquery(_) => "ExistsSubqueryExpr",
            ExprNode::Subquery(_) => "SubqueryExpr",
            ExprNode::ColumnName(_) => "ColumnNameExpr",
            ExprNode::Default(_) => "DefaultExpr",
            ExprNode::Position(_) => "PositionExpr",
            ExprNode::ParamMarker(_) => "ParamMarkerExpr",
            ExprNode::Variable(_) => "VariableExpr",
            ExprNode::Values(_) => "ValuesExpr",
            ExprNode::Row(_) => "RowExpr",
            ExprNode::Value(_) => "ValueExpr",
        }
    }

    /// Direct children in traversal order
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            ExprNode::BinaryOperation(n) => vec![&*n.l, &*n.r],
            ExprNode::UnaryOperation(n) => vec![&*n.v],
            ExprNode::Between(n) => vec![&*n.expr, &*n.left, &*n.right],
            ExprNode::Case(n) => {
                let mut out = Vec::with_capacity(n.when_clauses.len() + 2);
                out.extend(n.value.as_deref());
                out.extend(n.when_clauses.iter());
                out.extend(n.else_clause.as_deref());
                out
            }
            ExprNode::WhenClause(n) => vec![&*n.expr, &*n.result],
            ExprNode::PatternIn(n) => {
                let mut out = Vec::with_capacity(n.list.len() + 2);
                out.push(&*n.expr);
                out.extend(n.list.iter());
                out.extend(n.sel.as_deref());
                out
            }
            ExprNode::PatternLike(n) => vec![&*n.expr, &*n.pattern],
            ExprNode::PatternRegexp(n) => vec![&*n.expr, &*n.pattern],
            ExprNode::IsNull(n) => vec![&*n.expr],
            ExprNode::IsTruth(n) => vec![&*n.expr],
            ExprNode::Parentheses(n) => vec![&*n.expr],
            ExprNode::CompareSubquery(n) => vec![&*n.l, &*n.r],
            ExprNode::ExistsSubquery(n) => vec![&*n.sel],
            ExprNode::Position(n) => n.p.as_deref().into_iter().collect(),
            ExprNode::Variable(n) => n.value.as_deref().into_iter().collect(),
            ExprNode::Values(n) => vec![&*n.column],
            ExprNode::Row(n) => n.values.iter().collect(),
            ExprNode::Subquery(_)
            | ExprNode::ColumnName(_)
            | ExprNode::Default(_)
            | ExprNode::ParamMarker(_)
            | ExprNode::Value(_) => Vec::new(),
        }
    }

    /// Whether the node has no expression children
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Nesting depth of the tree; a lone leaf has depth 1
    ///
    /// Uses an explicit stack, so it is safe on trees too deep to recurse.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children().into_iter().map(|c| (c, depth + 1)));
        }
        max
    }

    /// Drop the tree without recursing
    ///
    /// The derived drop recurses once per level; use this for trees that
    /// may be deeper than the stack allows.
    pub fn dismantle(self) {
        let mut stack = vec![self];
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }

    /// Move every child out onto `out`, leaving NULL literals in boxed slots
    fn take_children(&mut self, out: &mut Vec<ExprNode>) {
        fn take(slot: &mut ExprNode) -> ExprNode {
            std::mem::take(slot)
        }
        match self {
            ExprNode::BinaryOperation(n) => out.extend([take(&mut n.l), take(&mut n.r)]),
            ExprNode::UnaryOperation(n) => out.push(take(&mut n.v)),
            ExprNode::Between(n) => {
                out.extend([take(&mut n.expr), take(&mut n.left), take(&mut n.right)])
            }
            ExprNode::Case(n) => {
                out.extend(n.value.take().map(|b| *b));
                out.append(&mut n.when_clauses);
                out.extend(n.else_clause.take().map(|b| *b));
            }
            ExprNode::WhenClause(n) => out.extend([take(&mut n.expr), take(&mut n.result)]),
            ExprNode::PatternIn(n) => {
                out.push(take(&mut n.expr));
                out.append(&mut n.list);
                out.extend(n.sel.take().map(|b| *b));
            }
            ExprNode::PatternLike(n) => out.extend([take(&mut n.expr), take(&mut n.pattern)]),
            ExprNode::PatternRegexp(n) => out.extend([take(&mut n.expr), take(&mut n.pattern)]),
            ExprNode::IsNull(n) => out.push(take(&mut n.expr)),
            ExprNode::IsTruth(n) => out.push(take(&mut n.expr)),
            ExprNode::Parentheses(n) => out.push(take(&mut n.expr)),
            ExprNode::CompareSubquery(n) => out.extend([take(&mut n.l), take(&mut n.r)]),
            ExprNode::ExistsSubquery(n) => out.push(take(&mut n.sel)),
            ExprNode::Position(n) => out.extend(n.p.take().map(|b| *b)),
            ExprNode::Variable(n) => out.extend(n.value.take().map(|b| *b)),
            ExprNode::Values(n) => out.push(take(&mut n.column)),
            ExprNode::Row(n) => out.append(&mut n.values),
            ExprNode::Subquery(_)
            | ExprNode::ColumnName(_)
            | ExprNode::Default(_)
            | ExprNode::ParamMarker(_)
            | ExprNode::Value(_) => {}
        }
    }

    // ===== Constructors =====

    pub fn value(datum: impl Into<Datum>) -> Self {
        ExprNode::Value(ValueExpr::new(datum))
    }

    pub fn int(v: i64) -> Self {
        Self::value(v)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self::value(Datum::String(v.into()))
    }

    pub fn null() -> Self {
        ExprNode::Value(ValueExpr::null())
    }

    pub fn column(name: ColumnName) -> Self {
        ExprNode::ColumnName(ColumnNameExpr { name })
    }

    pub fn binary(op: BinaryOp, l: ExprNode, r: ExprNode) -> Self {
        ExprNode::BinaryOperation(BinaryOperationExpr {
            op,
            l: Box::new(l),
            r: Box::new(r),
        })
    }

    pub fn unary(op: UnaryOp, v: ExprNode) -> Self {
        ExprNode::UnaryOperation(UnaryOperationExpr { op, v: Box::new(v) })
    }

    pub fn paren(expr: ExprNode) -> Self {
        ExprNode::Parentheses(ParenthesesExpr {
            expr: Box::new(expr),
        })
    }

    pub fn between(expr: ExprNode, left: ExprNode, right: ExprNode, not: bool) -> Self {
        ExprNode::Between(BetweenExpr {
            expr: Box::new(expr),
            left: Box::new(left),
            right: Box::new(right),
            not,
        })
    }

    pub fn is_null(expr: ExprNode, not: bool) -> Self {
        ExprNode::IsNull(IsNullExpr {
            expr: Box::new(expr),
            not,
        })
    }

    pub fn is_truth(expr: ExprNode, truth: bool, not: bool) -> Self {
        ExprNode::IsTruth(IsTruthExpr {
            expr: Box::new(expr),
            not,
            truth,
        })
    }

    pub fn like(expr: ExprNode, pattern: ExprNode, not: bool) -> Self {
        ExprNode::PatternLike(PatternLikeExpr {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            not,
            escape: DEFAULT_LIKE_ESCAPE,
        })
    }

    pub fn regexp(expr: ExprNode, pattern: ExprNode, not: bool) -> Self {
        ExprNode::PatternRegexp(PatternRegexpExpr {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            not,
        })
    }

    pub fn in_list(expr: ExprNode, list: Vec<ExprNode>, not: bool) -> Self {
        ExprNode::PatternIn(PatternInExpr {
            expr: Box::new(expr),
            list,
            sel: None,
            not,
        })
    }

    pub fn subquery(sql: impl Into<String>) -> Self {
        ExprNode::Subquery(SubqueryExpr { sql: sql.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_parts() {
        let col = ColumnName::new("id");
        assert_eq!(col.parts(), 1);
        assert_eq!(col.clone().with_table("t").parts(), 2);
        assert_eq!(col.with_table("t").with_schema("s").parts(), 3);
    }

    #[test]
    fn test_children_order_between() {
        let node = ExprNode::between(ExprNode::int(1), ExprNode::int(2), ExprNode::int(3), false);
        let children: Vec<_> = node.children().into_iter().cloned().collect();
        assert_eq!(
            children,
            vec![ExprNode::int(1), ExprNode::int(2), ExprNode::int(3)]
        );
    }

    #[test]
    fn test_children_order_case() {
        let node = ExprNode::Case(CaseExpr::new(
            Some(ExprNode::int(0)),
            vec![WhenClause::new(ExprNode::int(1), ExprNode::int(2))],
            Some(ExprNode::int(3)),
        ));
        let kinds: Vec<_> = node.children().iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["ValueExpr", "WhenClause", "ValueExpr"]);
    }

    #[test]
    fn test_children_skip_empty_optionals() {
        let node = ExprNode::Position(PositionExpr { n: 1, p: None });
        assert!(node.is_leaf());
        let node = ExprNode::Variable(VariableExpr {
            name: "a".into(),
            ..Default::default()
        });
        assert!(node.is_leaf());
    }

    #[test]
    fn test_depth() {
        assert_eq!(ExprNode::int(1).depth(), 1);
        let node = ExprNode::paren(ExprNode::binary(
            BinaryOp::Plus,
            ExprNode::int(1),
            ExprNode::unary(UnaryOp::Minus, ExprNode::int(2)),
        ));
        assert_eq!(node.depth(), 4);
    }

    #[test]
    fn test_depth_very_deep_tree() {
        let mut node = ExprNode::int(0);
        for _ in 0..100_000 {
            node = ExprNode::unary(UnaryOp::Minus, node);
        }
        assert_eq!(node.depth(), 100_001);
        node.dismantle();
    }

    #[test]
    fn test_dismantle_wide_and_deep() {
        let mut node = ExprNode::int(0);
        for i in 0..50_000 {
            node = if i % 2 == 0 {
                ExprNode::Row(RowExpr {
                    values: vec![node, ExprNode::int(i)],
                })
            } else {
                ExprNode::Case(CaseExpr::new(
                    None,
                    vec![WhenClause::new(node, ExprNode::int(i))],
                    Some(ExprNode::null()),
                ))
            };
        }
        assert!(node.depth() > 50_000);
        node.dismantle();
    }

    #[test]
    fn test_from_variant() {
        let node: ExprNode = ParamMarkerExpr::new(7).into();
        assert_eq!(node.kind_name(), "ParamMarkerExpr");
    }

    #[test]
    fn test_serde_round_trip() {
        let node = ExprNode::is_null(ExprNode::column(ColumnName::new("a")), true);
        let json = serde_json::to_string(&node).unwrap();
        let back: ExprNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}

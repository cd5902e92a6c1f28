// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Restore
//!
//! Renders an expression tree back to canonical SQL text.
//!
//! ## Canonical form
//!
//! - Identifiers are always backtick-quoted, with embedded backticks doubled.
//! - Keywords are upper-case.
//! - Operators use one spelling each (see [`crate::opcode`]); symbolic
//!   operators are written without spaces, keyword operators with one
//!   space on each side.
//! - Parentheses appear exactly where the tree has a `ParenthesesExpr`.
//!   Nothing is added or removed based on precedence.
//!
//! Restoring fails rather than emitting partial text when a child slot
//! holds the wrong shape, a required part is missing, or the tree is
//! deeper than the configured limit.
//!
//! ## Example
//!
//! ```rust
//! use sqlexpr_ast::{restore, ColumnName, ExprNode};
//!
//! let expr = ExprNode::between(
//!     ExprNode::column(ColumnName::new("b")),
//!     ExprNode::int(1),
//!     ExprNode::int(2),
//!     true,
//! );
//! assert_eq!(restore(&expr).unwrap(), "`b` NOT BETWEEN 1 AND 2");
//! ```

use tracing::debug;

use crate::config::AstConfig;
use crate::error::{AstError, AstResult};
use crate::expr::{
    BetweenExpr, BinaryOperationExpr, CaseExpr, ColumnName, ColumnNameExpr, CompareSubqueryExpr,
    DefaultExpr, ExistsSubqueryExpr, ExprNode, IsNullExpr, IsTruthExpr, ParamMarkerExpr,
    ParenthesesExpr, PatternInExpr, PatternLikeExpr, PatternRegexpExpr, PositionExpr, RowExpr,
    SubqueryExpr, UnaryOperationExpr, ValuesExpr, VariableExpr, WhenClause, DEFAULT_LIKE_ESCAPE,
};

/// Output buffer and limits for one restore run
#[derive(Debug)]
pub struct RestoreCtx {
    buf: String,
    depth: usize,
    max_depth: usize,
}

impl RestoreCtx {
    pub fn new(config: &AstConfig) -> Self {
        Self {
            buf: String::new(),
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Write a keyword, upper-cased
    pub fn write_keyword(&mut self, keyword: &str) {
        self.buf.push_str(&keyword.to_ascii_uppercase());
    }

    /// Write text as-is
    pub fn write_plain(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Write an identifier in backticks, doubling embedded backticks
    pub fn write_name(&mut self, name: &str) {
        self.buf.push('`');
        for c in name.chars() {
            if c == '`' {
                self.buf.push('`');
            }
            self.buf.push(c);
        }
        self.buf.push('`');
    }

    /// Write a string literal in single quotes
    pub fn write_string(&mut self, text: &str) {
        self.buf.push('\'');
        for c in text.chars() {
            match c {
                '\'' => self.buf.push_str("''"),
                '\\' => self.buf.push_str("\\\\"),
                c => self.buf.push(c),
            }
        }
        self.buf.push('\'');
    }

    /// Text written so far
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Restore a child node one level deeper
    pub fn restore_child(&mut self, node: &ExprNode) -> AstResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(AstError::TreeTooDeep {
                depth: self.depth,
                limit: self.max_depth,
            });
        }
        node.restore(self)?;
        self.depth -= 1;
        Ok(())
    }

    /// Restore a slot that only a [`SubqueryExpr`] may fill
    fn restore_subquery(&mut self, owner: &'static str, node: &ExprNode) -> AstResult<()> {
        if !matches!(node, ExprNode::Subquery(_)) {
            return Err(AstError::ShapeViolation {
                node: owner,
                expected: "SubqueryExpr",
                found: node.kind_name(),
            });
        }
        self.restore_child(node)
    }

    fn restore_list(&mut self, nodes: &[ExprNode]) -> AstResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            if i != 0 {
                self.write_plain(",");
            }
            self.restore_child(node)?;
        }
        Ok(())
    }
}

/// A value that can render itself as canonical SQL
pub trait Restore {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()>;
}

/// Restore `node` with the default configuration
pub fn restore(node: &ExprNode) -> AstResult<String> {
    restore_with(node, &AstConfig::default())
}

/// Restore `node` with an explicit configuration
pub fn restore_with(node: &ExprNode, config: &AstConfig) -> AstResult<String> {
    let mut ctx = RestoreCtx::new(config);
    match ctx.restore_child(node) {
        Ok(()) => Ok(ctx.into_string()),
        Err(e) => {
            debug!("Failed to restore {}: {}", node.kind_name(), e);
            Err(e)
        }
    }
}

impl ExprNode {
    /// Restore this node with the default configuration
    pub fn restore_sql(&self) -> AstResult<String> {
        restore(self)
    }
}

impl Restore for ExprNode {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        match self {
            ExprNode::BinaryOperation(n) => n.restore(ctx),
            ExprNode::UnaryOperation(n) => n.restore(ctx),
            ExprNode::Between(n) => n.restore(ctx),
            ExprNode::Case(n) => n.restore(ctx),
            ExprNode::WhenClause(n) => n.restore(ctx),
            ExprNode::PatternIn(n) => n.restore(ctx),
            ExprNode::PatternLike(n) => n.restore(ctx),
            ExprNode::PatternRegexp(n) => n.restore(ctx),
            ExprNode::IsNull(n) => n.restore(ctx),
            ExprNode::IsTruth(n) => n.restore(ctx),
            ExprNode::Parentheses(n) => n.restore(ctx),
            ExprNode::CompareSubquery(n) => n.restore(ctx),
            ExprNode::ExistsSubquery(n) => n.restore(ctx),
            ExprNode::Subquery(n) => n.restore(ctx),
            ExprNode::ColumnName(n) => n.restore(ctx),
            ExprNode::Default(n) => n.restore(ctx),
            ExprNode::Position(n) => n.restore(ctx),
            ExprNode::ParamMarker(n) => n.restore(ctx),
            ExprNode::Variable(n) => n.restore(ctx),
            ExprNode::Values(n) => n.restore(ctx),
            ExprNode::Row(n) => n.restore(ctx),
            ExprNode::Value(n) => n.restore(ctx),
        }
    }
}

impl Restore for BinaryOperationExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.l)?;
        if self.op.is_keyword() {
            ctx.write_keyword(self.op.literal());
        } else {
            ctx.write_plain(self.op.literal());
        }
        ctx.restore_child(&self.r)
    }
}

impl Restore for UnaryOperationExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.op.is_keyword() {
            ctx.write_keyword(self.op.literal());
        } else {
            ctx.write_plain(self.op.literal());
        }
        ctx.restore_child(&self.v)
    }
}

impl Restore for BetweenExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" NOT BETWEEN ");
        } else {
            ctx.write_keyword(" BETWEEN ");
        }
        ctx.restore_child(&self.left)?;
        ctx.write_keyword(" AND ");
        ctx.restore_child(&self.right)
    }
}

impl Restore for CaseExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.when_clauses.is_empty() {
            return Err(AstError::MissingChild {
                node: "CaseExpr",
                child: "WhenClauses",
            });
        }
        ctx.write_keyword("CASE");
        if let Some(value) = &self.value {
            ctx.write_plain(" ");
            ctx.restore_child(value)?;
        }
        for clause in &self.when_clauses {
            if !matches!(clause, ExprNode::WhenClause(_)) {
                return Err(AstError::ShapeViolation {
                    node: "CaseExpr",
                    expected: "WhenClause",
                    found: clause.kind_name(),
                });
            }
            ctx.write_plain(" ");
            ctx.restore_child(clause)?;
        }
        if let Some(else_clause) = &self.else_clause {
            ctx.write_keyword(" ELSE ");
            ctx.restore_child(else_clause)?;
        }
        ctx.write_keyword(" END");
        Ok(())
    }
}

impl Restore for WhenClause {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.write_keyword("WHEN ");
        ctx.restore_child(&self.expr)?;
        ctx.write_keyword(" THEN ");
        ctx.restore_child(&self.result)
    }
}

impl Restore for PatternInExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.sel.is_none() && self.list.is_empty() {
            return Err(AstError::MissingChild {
                node: "PatternInExpr",
                child: "List",
            });
        }
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" NOT IN ");
        } else {
            ctx.write_keyword(" IN ");
        }
        match &self.sel {
            Some(sel) => ctx.restore_subquery("PatternInExpr", sel),
            None => {
                ctx.write_plain("(");
                ctx.restore_list(&self.list)?;
                ctx.write_plain(")");
                Ok(())
            }
        }
    }
}

impl Restore for PatternLikeExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" NOT LIKE ");
        } else {
            ctx.write_keyword(" LIKE ");
        }
        ctx.restore_child(&self.pattern)?;
        if self.escape != DEFAULT_LIKE_ESCAPE {
            ctx.write_keyword(" ESCAPE ");
            ctx.write_string(self.escape.encode_utf8(&mut [0; 4]));
        }
        Ok(())
    }
}

impl Restore for PatternRegexpExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" NOT REGEXP ");
        } else {
            ctx.write_keyword(" REGEXP ");
        }
        ctx.restore_child(&self.pattern)
    }
}

impl Restore for IsNullExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" IS NOT NULL");
        } else {
            ctx.write_keyword(" IS NULL");
        }
        Ok(())
    }
}

impl Restore for IsTruthExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.expr)?;
        if self.not {
            ctx.write_keyword(" IS NOT");
        } else {
            ctx.write_keyword(" IS");
        }
        if self.truth {
            ctx.write_keyword(" TRUE");
        } else {
            ctx.write_keyword(" FALSE");
        }
        Ok(())
    }
}

impl Restore for ParenthesesExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.write_plain("(");
        ctx.restore_child(&self.expr)?;
        ctx.write_plain(")");
        Ok(())
    }
}

impl Restore for CompareSubqueryExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.restore_child(&self.l)?;
        if self.op.is_keyword() {
            ctx.write_keyword(self.op.literal());
        } else {
            ctx.write_plain(self.op.literal());
        }
        if self.all {
            ctx.write_keyword("ALL ");
        } else {
            ctx.write_keyword("ANY ");
        }
        ctx.restore_subquery("CompareSubqueryExpr", &self.r)
    }
}

impl Restore for ExistsSubqueryExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.not {
            ctx.write_keyword("NOT EXISTS ");
        } else {
            ctx.write_keyword("EXISTS ");
        }
        ctx.restore_subquery("ExistsSubqueryExpr", &self.sel)
    }
}

impl Restore for SubqueryExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.sql.trim().is_empty() {
            return Err(AstError::MissingChild {
                node: "SubqueryExpr",
                child: "Query",
            });
        }
        ctx.write_plain("(");
        ctx.write_plain(&self.sql);
        ctx.write_plain(")");
        Ok(())
    }
}

impl Restore for ColumnName {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.name.is_empty() {
            return Err(AstError::MissingChild {
                node: "ColumnName",
                child: "Name",
            });
        }
        if self.table.as_deref() == Some("") || (self.schema.is_some() && self.table.is_none()) {
            return Err(AstError::MissingChild {
                node: "ColumnName",
                child: "Table",
            });
        }
        if self.schema.as_deref() == Some("") {
            return Err(AstError::MissingChild {
                node: "ColumnName",
                child: "Schema",
            });
        }
        if let Some(schema) = &self.schema {
            ctx.write_name(schema);
            ctx.write_plain(".");
        }
        if let Some(table) = &self.table {
            ctx.write_name(table);
            ctx.write_plain(".");
        }
        ctx.write_name(&self.name);
        Ok(())
    }
}

impl Restore for ColumnNameExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        self.name.restore(ctx)
    }
}

impl Restore for DefaultExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.write_keyword("DEFAULT");
        if let Some(name) = &self.name {
            ctx.write_plain("(");
            name.restore(ctx)?;
            ctx.write_plain(")");
        }
        Ok(())
    }
}

impl Restore for PositionExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        match &self.p {
            Some(p) => ctx.restore_child(p),
            None if self.n == 0 => Err(AstError::MissingChild {
                node: "PositionExpr",
                child: "N",
            }),
            None => {
                ctx.write_plain(&self.n.to_string());
                Ok(())
            }
        }
    }
}

impl Restore for ParamMarkerExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        ctx.write_plain("?");
        Ok(())
    }
}

impl Restore for VariableExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.name.is_empty() {
            return Err(AstError::MissingChild {
                node: "VariableExpr",
                child: "Name",
            });
        }
        if self.is_system {
            ctx.write_plain("@@");
            if self.explicit_scope {
                if self.is_global {
                    ctx.write_keyword("GLOBAL");
                } else {
                    ctx.write_keyword("SESSION");
                }
                ctx.write_plain(".");
            }
        } else {
            ctx.write_plain("@");
        }
        ctx.write_name(&self.name);
        if let Some(value) = &self.value {
            ctx.write_plain(":=");
            ctx.restore_child(value)?;
        }
        Ok(())
    }
}

impl Restore for ValuesExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        let ExprNode::ColumnName(column) = &*self.column else {
            return Err(AstError::ShapeViolation {
                node: "ValuesExpr",
                expected: "ColumnNameExpr",
                found: self.column.kind_name(),
            });
        };
        ctx.write_keyword("VALUES");
        ctx.write_plain("(");
        column.restore(ctx)?;
        ctx.write_plain(")");
        Ok(())
    }
}

impl Restore for RowExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        if self.values.is_empty() {
            return Err(AstError::MissingChild {
                node: "RowExpr",
                child: "Values",
            });
        }
        ctx.write_keyword("ROW");
        ctx.write_plain("(");
        ctx.restore_list(&self.values)?;
        ctx.write_plain(")");
        Ok(())
    }
}

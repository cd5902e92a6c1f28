// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expression Parser
//!
//! A recursive-descent parser that builds [`ExprNode`] trees from MySQL
//! expression text. It exists to drive restore conformance tests: every
//! canonical string the restorer emits must parse back to an equivalent
//! tree.
//!
//! Precedence, loosest first:
//!
//! ```text
//! OR ||  >  XOR  >  AND &&  >  NOT  >  IS / comparison / ALL|ANY
//!        >  IN BETWEEN LIKE REGEXP  >  |  >  &  >  << >>  >  + -
//!        >  * / DIV % MOD  >  ^  >  unary - + ~ !  >  primary
//! ```
//!
//! Explicit parentheses become `ParenthesesExpr`; `(a, b)` becomes a row.

use sqlexpr_ast::expr::DEFAULT_LIKE_ESCAPE;
use sqlexpr_ast::{
    BinaryOp, CaseExpr, ColumnName, CompareSubqueryExpr, Datum, DefaultExpr, ExistsSubqueryExpr,
    ExprNode, ParamMarkerExpr, PatternInExpr, PatternLikeExpr, RowExpr, UnaryOp, ValuesExpr,
    VariableExpr, WhenClause,
};

use crate::error::{HarnessError, HarnessResult};
use crate::lexer::{Lexer, Spanned, Token};

/// Parse a complete expression
pub fn parse_expr(src: &str) -> HarnessResult<ExprNode> {
    let mut parser = Parser::new(src)?;
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

pub struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
    param_count: usize,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> HarnessResult<Self> {
        Ok(Self {
            src,
            tokens: Lexer::new(src).tokenize()?,
            pos: 0,
            param_count: 0,
        })
    }

    // ===== Token helpers =====

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].start
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn is_keyword_at(&self, n: usize, keyword: &str) -> bool {
        matches!(self.peek_at(n), Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.is_keyword_at(0, keyword)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> HarnessResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self.peek(), Token::Symbol(s) if *s == symbol)
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.is_symbol(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: &str) -> HarnessResult<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(symbol))
        }
    }

    fn expect_eof(&self) -> HarnessResult<()> {
        match self.peek() {
            Token::Eof => Ok(()),
            _ => Err(self.unexpected("end of input")),
        }
    }

    fn unexpected(&self, expected: &str) -> HarnessError {
        match self.peek() {
            Token::Eof => HarnessError::UnexpectedEof(expected.to_string()),
            found => HarnessError::syntax(
                self.offset(),
                format!("expected {}, found {:?}", expected, found),
            ),
        }
    }

    // ===== Boolean levels =====

    pub fn parse_expr(&mut self) -> HarnessResult<ExprNode> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> HarnessResult<ExprNode> {
        let mut left = self.parse_xor()?;
        while self.eat_keyword("OR") || self.eat_symbol("||") {
            let right = self.parse_xor()?;
            left = ExprNode::binary(BinaryOp::LogicOr, left, right);
        }
        Ok(left)
    }

    fn parse_xor(&mut self) -> HarnessResult<ExprNode> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("XOR") {
            let right = self.parse_and()?;
            left = ExprNode::binary(BinaryOp::LogicXor, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> HarnessResult<ExprNode> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("AND") || self.eat_symbol("&&") {
            let right = self.parse_not()?;
            left = ExprNode::binary(BinaryOp::LogicAnd, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> HarnessResult<ExprNode> {
        if self.eat_keyword("NOT") {
            let operand = self.parse_not()?;
            return Ok(ExprNode::unary(UnaryOp::Not, operand));
        }
        self.parse_boolean_primary()
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        match self.peek() {
            Token::Symbol(s @ ("=" | "<=>" | "<" | "<=" | ">" | ">=" | "<>" | "!=")) => {
                s.parse().ok()
            }
            _ => None,
        }
    }

    fn parse_boolean_primary(&mut self) -> HarnessResult<ExprNode> {
        let mut left = self.parse_predicate()?;
        loop {
            if self.eat_keyword("IS") {
                let not = self.eat_keyword("NOT");
                left = if self.eat_keyword("NULL") {
                    ExprNode::is_null(left, not)
                } else if self.eat_keyword("TRUE") {
                    ExprNode::is_truth(left, true, not)
                } else if self.eat_keyword("FALSE") {
                    ExprNode::is_truth(left, false, not)
                } else {
                    return Err(self.unexpected("NULL, TRUE or FALSE"));
                };
            } else if let Some(op) = self.comparison_op() {
                self.advance();
                let quantifier = if self.eat_keyword("ALL") {
                    Some(true)
                } else if self.eat_keyword("ANY") || self.eat_keyword("SOME") {
                    Some(false)
                } else {
                    None
                };
                left = match quantifier {
                    Some(all) => {
                        let r = self.parse_subquery()?;
                        ExprNode::CompareSubquery(CompareSubqueryExpr {
                            l: Box::new(left),
                            op,
                            r: Box::new(r),
                            all,
                        })
                    }
                    None => {
                        let right = self.parse_predicate()?;
                        ExprNode::binary(op, left, right)
                    }
                };
            } else {
                return Ok(left);
            }
        }
    }

    // ===== Predicates =====

    fn parse_predicate(&mut self) -> HarnessResult<ExprNode> {
        let expr = self.parse_bit_or()?;
        let not = if self.is_keyword("NOT")
            && ["IN", "BETWEEN", "LIKE", "REGEXP", "RLIKE"]
                .iter()
                .any(|k| self.is_keyword_at(1, k))
        {
            self.advance();
            true
        } else {
            false
        };

        if self.eat_keyword("IN") {
            return self.parse_in_tail(expr, not);
        }
        if self.eat_keyword("BETWEEN") {
            let low = self.parse_bit_or()?;
            self.expect_keyword("AND")?;
            let high = self.parse_predicate()?;
            return Ok(ExprNode::between(expr, low, high, not));
        }
        if self.eat_keyword("LIKE") {
            let pattern = self.parse_bit_or()?;
            let escape = if self.eat_keyword("ESCAPE") {
                self.parse_escape_char()?
            } else {
                DEFAULT_LIKE_ESCAPE
            };
            return Ok(ExprNode::PatternLike(PatternLikeExpr {
                expr: Box::new(expr),
                pattern: Box::new(pattern),
                not,
                escape,
            }));
        }
        if self.eat_keyword("REGEXP") || self.eat_keyword("RLIKE") {
            let pattern = self.parse_bit_or()?;
            return Ok(ExprNode::regexp(expr, pattern, not));
        }
        Ok(expr)
    }

    fn parse_escape_char(&mut self) -> HarnessResult<char> {
        let mut chars = match self.peek() {
            Token::Str(s) => s.chars(),
            _ => return Err(self.unexpected("escape string")),
        };
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                self.advance();
                Ok(c)
            }
            _ => Err(HarnessError::syntax(
                self.offset(),
                "escape must be a single character",
            )),
        }
    }

    fn parse_in_tail(&mut self, expr: ExprNode, not: bool) -> HarnessResult<ExprNode> {
        if self.is_symbol("(") && self.is_keyword_at(1, "SELECT") {
            let sel = self.parse_subquery()?;
            return Ok(ExprNode::PatternIn(PatternInExpr {
                expr: Box::new(expr),
                list: Vec::new(),
                sel: Some(Box::new(sel)),
                not,
            }));
        }
        self.expect_symbol("(")?;
        let list = self.parse_expr_list()?;
        self.expect_symbol(")")?;
        Ok(ExprNode::in_list(expr, list, not))
    }

    fn parse_expr_list(&mut self) -> HarnessResult<Vec<ExprNode>> {
        let mut list = vec![self.parse_expr()?];
        while self.eat_symbol(",") {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    // ===== Bit and arithmetic levels =====

    fn parse_binary_level(
        &mut self,
        ops: &[(&str, BinaryOp)],
        next: fn(&mut Self) -> HarnessResult<ExprNode>,
    ) -> HarnessResult<ExprNode> {
        let mut left = next(self)?;
        'outer: loop {
            for (spelling, op) in ops {
                let matched = match self.peek() {
                    Token::Symbol(s) => s == spelling,
                    Token::Word(w) => w.eq_ignore_ascii_case(spelling),
                    _ => false,
                };
                if matched {
                    self.advance();
                    let right = next(self)?;
                    left = ExprNode::binary(*op, left, right);
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn parse_bit_or(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(&[("|", BinaryOp::BitOr)], Self::parse_bit_and)
    }

    fn parse_bit_and(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(&[("&", BinaryOp::BitAnd)], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(
            &[("<<", BinaryOp::LeftShift), (">>", BinaryOp::RightShift)],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(
            &[("+", BinaryOp::Plus), ("-", BinaryOp::Minus)],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(
            &[
                ("*", BinaryOp::Mul),
                ("/", BinaryOp::Div),
                ("DIV", BinaryOp::IntDiv),
                ("%", BinaryOp::Mod),
                ("MOD", BinaryOp::Mod),
            ],
            Self::parse_bit_xor,
        )
    }

    fn parse_bit_xor(&mut self) -> HarnessResult<ExprNode> {
        self.parse_binary_level(&[("^", BinaryOp::BitXor)], Self::parse_unary)
    }

    fn parse_unary(&mut self) -> HarnessResult<ExprNode> {
        let op = match self.peek() {
            Token::Symbol("-") => Some(UnaryOp::Minus),
            Token::Symbol("+") => Some(UnaryOp::Plus),
            Token::Symbol("~") => Some(UnaryOp::BitNeg),
            Token::Symbol("!") => Some(UnaryOp::Not2),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(ExprNode::unary(op, operand))
            }
            None => self.parse_primary(),
        }
    }

    // ===== Primary =====

    fn parse_primary(&mut self) -> HarnessResult<ExprNode> {
        let offset = self.offset();
        match self.peek().clone() {
            Token::Int(digits) => {
                self.advance();
                let datum = match digits.parse::<i64>() {
                    Ok(v) => Datum::Int(v),
                    Err(_) => match digits.parse::<u64>() {
                        Ok(v) => Datum::Uint(v),
                        Err(_) => Datum::Decimal(digits),
                    },
                };
                Ok(ExprNode::value(datum))
            }
            Token::Decimal(digits) => {
                self.advance();
                Ok(ExprNode::value(Datum::Decimal(digits)))
            }
            Token::Float(text) => {
                self.advance();
                let v: f64 = text
                    .parse()
                    .map_err(|_| HarnessError::syntax(offset, format!("bad float {}", text)))?;
                Ok(ExprNode::value(v))
            }
            Token::Str(s) => {
                self.advance();
                Ok(ExprNode::string(s))
            }
            Token::QuotedIdent(_) => self.parse_column_name().map(ExprNode::column),
            Token::Symbol("?") => {
                self.advance();
                let order = self.param_count;
                self.param_count += 1;
                Ok(ExprNode::ParamMarker(ParamMarkerExpr { offset, order }))
            }
            Token::Symbol("@") | Token::Symbol("@@") => self.parse_variable(),
            Token::Symbol("(") => self.parse_parenthesized(),
            Token::Word(word) => self.parse_word(&word),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_word(&mut self, word: &str) -> HarnessResult<ExprNode> {
        match word.to_ascii_uppercase().as_str() {
            "NULL" => {
                self.advance();
                Ok(ExprNode::null())
            }
            "TRUE" => {
                self.advance();
                Ok(ExprNode::value(true))
            }
            "FALSE" => {
                self.advance();
                Ok(ExprNode::value(false))
            }
            "CASE" => self.parse_case(),
            "EXISTS" => {
                self.advance();
                let sel = self.parse_subquery()?;
                Ok(ExprNode::ExistsSubquery(ExistsSubqueryExpr {
                    sel: Box::new(sel),
                    not: false,
                }))
            }
            "DEFAULT" => {
                self.advance();
                let name = if self.eat_symbol("(") {
                    let name = self.parse_column_name()?;
                    self.expect_symbol(")")?;
                    Some(name)
                } else {
                    None
                };
                Ok(ExprNode::Default(DefaultExpr { name }))
            }
            "VALUES" if matches!(self.peek_at(1), Token::Symbol("(")) => {
                self.advance();
                self.expect_symbol("(")?;
                let name = self.parse_column_name()?;
                self.expect_symbol(")")?;
                Ok(ExprNode::Values(ValuesExpr {
                    column: Box::new(ExprNode::column(name)),
                }))
            }
            "ROW" if matches!(self.peek_at(1), Token::Symbol("(")) => {
                self.advance();
                self.expect_symbol("(")?;
                let values = self.parse_expr_list()?;
                self.expect_symbol(")")?;
                Ok(ExprNode::Row(RowExpr { values }))
            }
            _ => self.parse_column_name().map(ExprNode::column),
        }
    }

    fn parse_identifier(&mut self) -> HarnessResult<String> {
        match self.peek() {
            Token::Word(_) | Token::QuotedIdent(_) => {}
            _ => return Err(self.unexpected("identifier")),
        }
        match self.advance() {
            Token::Word(w) | Token::QuotedIdent(w) => Ok(w),
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// `name`, `table.name` or `schema.table.name`
    fn parse_column_name(&mut self) -> HarnessResult<ColumnName> {
        let mut parts = vec![self.parse_identifier()?];
        while parts.len() < 3 && self.eat_symbol(".") {
            parts.push(self.parse_identifier()?);
        }
        let mut parts = parts.into_iter().rev();
        let name = parts.next().unwrap_or_default();
        Ok(ColumnName {
            table: parts.next(),
            schema: parts.next(),
            name,
        })
    }

    fn parse_variable(&mut self) -> HarnessResult<ExprNode> {
        let is_system = matches!(self.advance(), Token::Symbol("@@"));
        let mut var = VariableExpr {
            is_system,
            ..Default::default()
        };
        if is_system && matches!(self.peek_at(1), Token::Symbol(".")) {
            if self.is_keyword("GLOBAL") {
                var.is_global = true;
                var.explicit_scope = true;
            } else if self.is_keyword("SESSION") || self.is_keyword("LOCAL") {
                var.explicit_scope = true;
            }
            if var.explicit_scope {
                self.advance();
                self.advance();
            }
        }
        var.name = match self.peek().clone() {
            Token::Word(w) | Token::QuotedIdent(w) | Token::Str(w) => {
                self.advance();
                w
            }
            _ => return Err(self.unexpected("variable name")),
        };
        if !is_system && self.eat_symbol(":=") {
            var.value = Some(Box::new(self.parse_expr()?));
        }
        Ok(ExprNode::Variable(var))
    }

    fn parse_case(&mut self) -> HarnessResult<ExprNode> {
        self.expect_keyword("CASE")?;
        let value = if self.is_keyword("WHEN") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let mut whens = Vec::new();
        while self.eat_keyword("WHEN") {
            let cond = self.parse_expr()?;
            self.expect_keyword("THEN")?;
            let result = self.parse_expr()?;
            whens.push(WhenClause::new(cond, result));
        }
        if whens.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_clause = if self.eat_keyword("ELSE") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_keyword("END")?;
        Ok(ExprNode::Case(CaseExpr::new(value, whens, else_clause)))
    }

    fn parse_parenthesized(&mut self) -> HarnessResult<ExprNode> {
        if self.is_keyword_at(1, "SELECT") {
            return self.parse_subquery();
        }
        self.expect_symbol("(")?;
        let mut list = self.parse_expr_list()?;
        self.expect_symbol(")")?;
        if list.len() == 1 {
            Ok(ExprNode::paren(list.remove(0)))
        } else {
            Ok(ExprNode::Row(RowExpr { values: list }))
        }
    }

    /// `( SELECT ... )`, kept as raw text since statements are not modeled
    fn parse_subquery(&mut self) -> HarnessResult<ExprNode> {
        self.expect_symbol("(")?;
        if !self.is_keyword("SELECT") {
            return Err(self.unexpected("SELECT"));
        }
        let start = self.offset();
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Token::Eof => return Err(self.unexpected(")")),
                Token::Symbol("(") => depth += 1,
                Token::Symbol(")") => {
                    depth -= 1;
                    if depth == 0 {
                        let end = self.offset();
                        self.advance();
                        return Ok(ExprNode::subquery(self.src[start..end].trim()));
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(src: &str) -> String {
        parse_expr(src).unwrap().restore_sql().unwrap()
    }

    #[test]
    fn test_precedence_without_parens() {
        let tree = parse_expr("1+2*3").unwrap();
        match tree {
            ExprNode::BinaryOperation(b) => {
                assert_eq!(b.op, BinaryOp::Plus);
                assert!(matches!(*b.r, ExprNode::BinaryOperation(_)));
            }
            other => panic!("expected binary operation, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_are_nodes() {
        let tree = parse_expr("(1+2)*3").unwrap();
        let ExprNode::BinaryOperation(b) = tree else {
            panic!("expected binary operation");
        };
        assert!(matches!(*b.l, ExprNode::Parentheses(_)));
    }

    #[test]
    fn test_not_equal_spellings() {
        assert_eq!(parse_expr("a<>5").unwrap(), parse_expr("a != 5").unwrap());
    }

    #[test]
    fn test_keywords_any_case() {
        assert_eq!(sql("a Is Not nUll"), "`a` IS NOT NULL");
        assert_eq!(sql("x not between 1 and 2"), "`x` NOT BETWEEN 1 AND 2");
    }

    #[test]
    fn test_between_binds_tighter_than_and() {
        assert_eq!(sql("a between 1 and 2 and b"), "`a` BETWEEN 1 AND 2 AND `b`");
    }

    #[test]
    fn test_param_marker_order() {
        let tree = parse_expr("? + ?").unwrap();
        let ExprNode::BinaryOperation(b) = tree else {
            panic!("expected binary operation");
        };
        assert_eq!(*b.l, ExprNode::ParamMarker(ParamMarkerExpr { offset: 0, order: 0 }));
        assert_eq!(*b.r, ExprNode::ParamMarker(ParamMarkerExpr { offset: 4, order: 1 }));
    }

    #[test]
    fn test_subquery_text_is_kept() {
        assert_eq!(
            sql("a in (select b from t where c = (1))"),
            "`a` IN (select b from t where c = (1))"
        );
        assert_eq!(sql("a > all (select 1)"), "`a`>ALL (select 1)");
        assert_eq!(sql("exists (select 1)"), "EXISTS (select 1)");
    }

    #[test]
    fn test_variables() {
        assert_eq!(sql("@a"), "@`a`");
        assert_eq!(sql("@@global.sql_mode"), "@@GLOBAL.`sql_mode`");
        assert_eq!(sql("@@session.autocommit"), "@@SESSION.`autocommit`");
        assert_eq!(sql("@a := 1"), "@`a`:=1");
    }

    #[test]
    fn test_rlike_normalizes() {
        assert_eq!(sql("a rlike 'x'"), "`a` REGEXP 'x'");
    }

    #[test]
    fn test_like_escape() {
        assert_eq!(sql("a like 'x|%' escape '|'"), "`a` LIKE 'x|%' ESCAPE '|'");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_expr("1 +"),
            Err(HarnessError::UnexpectedEof(_))
        ));
        assert!(matches!(
            parse_expr("a is maybe"),
            Err(HarnessError::Syntax { offset: 5, .. })
        ));
        assert!(parse_expr("case end").is_err());
        assert!(parse_expr("1 2").is_err());
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Operators
//!
//! Binary and unary operator kinds with their canonical spelling.
//!
//! Several operators have more than one surface spelling in SQL text.
//! Parsing any of them yields the same variant, so the restored text
//! always uses the single canonical literal:
//!
//! | Surface spellings      | Variant              | Restored  |
//! |------------------------|----------------------|-----------|
//! | `!=`, `<>`             | [`BinaryOp::Ne`]     | `!=`      |
//! | `AND`, `&&`            | [`BinaryOp::LogicAnd`] | ` AND ` |
//! | `OR`, `\|\|`           | [`BinaryOp::LogicOr`]  | ` OR `  |
//! | `%`, `MOD`             | [`BinaryOp::Mod`]    | `%`       |
//!
//! Keyword operators carry their separating spaces in the literal;
//! symbolic operators carry none.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AstError;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Logical
    LogicAnd,
    LogicOr,
    LogicXor,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    NullEq,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    IntDiv,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// The canonical literal written between the operands
    pub fn literal(self) -> &'static str {
        match self {
            BinaryOp::LogicAnd => " AND ",
            BinaryOp::LogicOr => " OR ",
            BinaryOp::LogicXor => " XOR ",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::NullEq => "<=>",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::IntDiv => " DIV ",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
        }
    }

    /// Whether the literal is a keyword (and so is written upper-case with spaces)
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            BinaryOp::LogicAnd | BinaryOp::LogicOr | BinaryOp::LogicXor | BinaryOp::IntDiv
        )
    }

    /// Whether this is a comparison usable in `<expr> <op> ALL|ANY (<subquery>)`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::NullEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl FromStr for BinaryOp {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_uppercase().as_str() {
            "AND" | "&&" => BinaryOp::LogicAnd,
            "OR" | "||" => BinaryOp::LogicOr,
            "XOR" => BinaryOp::LogicXor,
            "=" => BinaryOp::Eq,
            "!=" | "<>" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "<=>" => BinaryOp::NullEq,
            "+" => BinaryOp::Plus,
            "-" => BinaryOp::Minus,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "DIV" => BinaryOp::IntDiv,
            "%" | "MOD" => BinaryOp::Mod,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::LeftShift,
            ">>" => BinaryOp::RightShift,
            _ => return Err(AstError::InvalidOperator(s.to_string())),
        };
        Ok(op)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNeg,
    /// Keyword form, `NOT x`
    Not,
    /// Symbolic form, `!x`
    Not2,
}

impl UnaryOp {
    /// The canonical literal written before the operand
    pub fn literal(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNeg => "~",
            UnaryOp::Not => "NOT ",
            UnaryOp::Not2 => "!",
        }
    }

    pub fn is_keyword(self) -> bool {
        self == UnaryOp::Not
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl FromStr for UnaryOp {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_uppercase().as_str() {
            "+" => UnaryOp::Plus,
            "-" => UnaryOp::Minus,
            "~" => UnaryOp::BitNeg,
            "NOT" => UnaryOp::Not,
            "!" => UnaryOp::Not2,
            _ => return Err(AstError::InvalidOperator(s.to_string())),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_equal_spellings_normalize() {
        let a: BinaryOp = "<>".parse().unwrap();
        let b: BinaryOp = "!=".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.literal(), "!=");
    }

    #[test]
    fn test_keyword_spellings_case_insensitive() {
        assert_eq!("and".parse::<BinaryOp>().unwrap(), BinaryOp::LogicAnd);
        assert_eq!("&&".parse::<BinaryOp>().unwrap(), BinaryOp::LogicAnd);
        assert_eq!("Mod".parse::<BinaryOp>().unwrap(), BinaryOp::Mod);
        assert_eq!("div".parse::<BinaryOp>().unwrap(), BinaryOp::IntDiv);
    }

    #[test]
    fn test_keyword_literals_are_spaced() {
        assert_eq!(BinaryOp::LogicOr.to_string(), " OR ");
        assert!(BinaryOp::LogicOr.is_keyword());
        assert!(!BinaryOp::Plus.is_keyword());
        assert_eq!(UnaryOp::Not.to_string(), "NOT ");
    }

    #[test]
    fn test_unknown_operator() {
        let err = "=>".parse::<BinaryOp>().unwrap_err();
        assert_eq!(err, AstError::InvalidOperator("=>".to_string()));
        assert!("?".parse::<UnaryOp>().is_err());
    }

    #[test]
    fn test_comparison_set() {
        assert!(BinaryOp::Ge.is_comparison());
        assert!(!BinaryOp::Plus.is_comparison());
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Literal Values
//!
//! The value driver: how literal constants are stored and spelled.
//!
//! The expression tree treats literals as opaque leaves. It only needs a
//! literal to be visitable (it has no children) and to render itself
//! through [`Restore`]. Everything about literal typing is owned here.
//!
//! ## Canonical spelling
//!
//! - `Null`: `NULL`
//! - `Bool`: `TRUE` / `FALSE`
//! - `Int` / `Uint`: decimal digits, `-` sign for negatives
//! - `Decimal`: the exact digits it was created from
//! - `Float`: exponent form (`1.5e0`), so it re-reads as a float
//! - `String`: single-quoted, with `'` doubled and `\` escaped

use serde::{Deserialize, Serialize};

use crate::error::{AstError, AstResult};
use crate::restore::{Restore, RestoreCtx};

/// A literal constant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Datum {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// Fixed-point number kept as its source digits
    Decimal(String),
    String(String),
}

impl Restore for Datum {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        match self {
            Datum::Null => ctx.write_keyword("NULL"),
            Datum::Bool(true) => ctx.write_keyword("TRUE"),
            Datum::Bool(false) => ctx.write_keyword("FALSE"),
            Datum::Int(i) => ctx.write_plain(&i.to_string()),
            Datum::Uint(u) => ctx.write_plain(&u.to_string()),
            Datum::Float(f) => {
                if !f.is_finite() {
                    return Err(AstError::InvalidLiteral {
                        value: f.to_string(),
                        reason: "non-finite float has no SQL spelling".to_string(),
                    });
                }
                ctx.write_plain(&format!("{:e}", f));
            }
            Datum::Decimal(d) => {
                if d.is_empty() {
                    return Err(AstError::InvalidLiteral {
                        value: String::new(),
                        reason: "empty decimal".to_string(),
                    });
                }
                ctx.write_plain(d);
            }
            Datum::String(s) => ctx.write_string(s),
        }
        Ok(())
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<u64> for Datum {
    fn from(v: u64) -> Self {
        Datum::Uint(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::String(v)
    }
}

/// Literal value leaf
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueExpr {
    pub datum: Datum,
}

impl ValueExpr {
    pub fn new(datum: impl Into<Datum>) -> Self {
        Self {
            datum: datum.into(),
        }
    }

    pub fn null() -> Self {
        Self::default()
    }
}

impl Restore for ValueExpr {
    fn restore(&self, ctx: &mut RestoreCtx) -> AstResult<()> {
        self.datum.restore(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AstConfig;

    fn render(d: Datum) -> AstResult<String> {
        let mut ctx = RestoreCtx::new(&AstConfig::default());
        d.restore(&mut ctx)?;
        Ok(ctx.into_string())
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(render(Datum::Null).unwrap(), "NULL");
        assert_eq!(render(Datum::Bool(true)).unwrap(), "TRUE");
        assert_eq!(render(Datum::Bool(false)).unwrap(), "FALSE");
        assert_eq!(render(Datum::Int(-42)).unwrap(), "-42");
        assert_eq!(render(Datum::Uint(u64::MAX)).unwrap(), "18446744073709551615");
        assert_eq!(render(Datum::Decimal("3.140".into())).unwrap(), "3.140");
    }

    #[test]
    fn test_float_uses_exponent_form() {
        assert_eq!(render(Datum::Float(1.5)).unwrap(), "1.5e0");
        assert_eq!(render(Datum::Float(1200.0)).unwrap(), "1.2e3");
    }

    #[test]
    fn test_non_finite_float_fails() {
        let err = render(Datum::Float(f64::NAN)).unwrap_err();
        assert!(matches!(err, AstError::InvalidLiteral { .. }));
        assert!(render(Datum::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(render(Datum::from("")).unwrap(), "''");
        assert_eq!(render(Datum::from("it's")).unwrap(), "'it''s'");
        assert_eq!(render(Datum::from(r"a\b")).unwrap(), r"'a\\b'");
    }
}

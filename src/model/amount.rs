//! Amount type for monetary values as they appear in the ledger sheet.
//!
//! The sheet is formatted for pt-BR, so cell values look like `R$ 1.234,56`:
//! an optional currency symbol, dots as thousands separators and a comma as
//! the decimal separator. The canonical transaction strings exchanged between
//! the interpreter and the update engine use a plain dot separator instead,
//! so the two parse paths are kept apart.

use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A monetary value backed by `Decimal`.
///
/// `Display` renders the pt-BR sheet format (`R$ 1.234,56`, minus sign in
/// front of the symbol for negative values). Use [`Amount::plain`] for the
/// value written back into a cell, which carries no symbol and no grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses a value read from a sheet cell.
    ///
    /// Strips the `R$` symbol and thousands separators and unifies the
    /// decimal comma before parsing. An empty cell reads as zero.
    pub fn from_sheet(value: &str) -> Result<Self> {
        let cleaned: String = value
            .replace("R$", "")
            .replace('.', "")
            .replace(',', ".")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Ok(Self::ZERO);
        }
        let value = Decimal::from_str(&cleaned)
            .with_context(|| format!("cell does not hold a monetary value: '{value}'"))?;
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The decimal-comma form written into a value cell, e.g. `1234,56`.
    pub fn plain(&self) -> String {
        format!("{:.2}", self.0).replace('.', ",")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        let fixed = format!("{:.2}", self.0.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        write!(f, "{sign}R$ {},{frac_part}", group_thousands(int_part))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Inserts pt-BR thousands separators into a bare integer string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

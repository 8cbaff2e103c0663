//! The canonical transaction form exchanged between the classifier, the
//! natural-language interpreter, the formatting assistant and the update
//! engine: `"<amount> / <description>"`, dot decimal separator, a leading
//! minus for outflows.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A signed amount plus a free-text description.
///
/// The sign carries the direction: negative is an outflow (expense), positive
/// is an inflow (income). A zero amount is representable but the update
/// engine treats it as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    amount: Decimal,
    description: String,
}

impl Transaction {
    pub fn new(amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            amount,
            description: description.into(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// The audit-trail line appended to the target cell's note.
    pub fn note_line(&self) -> String {
        format!("{:.2} - {}", self.amount.abs(), self.description)
    }
}

/// Parses the canonical pattern `<optional -><digits>[.,digits] / <free text>`.
///
/// A decimal comma is accepted and unified to a dot, nothing else is
/// normalized here. Anything that does not match the pattern exactly is
/// rejected, which is what routes free-form chat text to the interpreter.
impl FromStr for Transaction {
    type Err = ParseTransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount_part, description) = s.split_once(" / ").ok_or(ParseTransactionError)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(ParseTransactionError);
        }
        let amount_part = amount_part.trim().replace(',', ".");
        let digits = amount_part.strip_prefix('-').unwrap_or(&amount_part);
        let valid = !digits.is_empty()
            && !digits.starts_with('.')
            && !digits.ends_with('.')
            && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
            && digits.chars().filter(|c| *c == '.').count() <= 1;
        if !valid {
            return Err(ParseTransactionError);
        }
        let amount = Decimal::from_str(&amount_part).map_err(|_| ParseTransactionError)?;
        Ok(Self::new(amount, description))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.amount, self.description)
    }
}

/// The input does not match the canonical transaction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTransactionError;

impl fmt::Display for ParseTransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text does not match '<amount> / <description>'")
    }
}

impl std::error::Error for ParseTransactionError {}

//! Intent classification for transcript messages.

use crate::model::{Lexicon, Message, Transaction};

/// Every category a message can classify into. Classification is total: any
/// text lands in exactly one arm, with `Unrecognized` as the explicit
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The bot's own reply, detected by the reserved prefix. Always wins.
    SystemReply,
    /// Blank or whitespace-only text.
    Empty,
    /// Text already in the canonical `<amount> / <description>` form.
    Transaction(Transaction),
    /// The "diario" query: today's accumulated spending.
    DailyOutcome,
    /// The "saldo" query: the current running balance.
    Balance,
    /// The "zerar" command: reset today's spending total.
    Reset,
    /// The "notas" query: today's audit-trail lines.
    DetailedBalance,
    /// Anything else; may still be promoted by the interpreter.
    Unrecognized,
}

/// Classifies raw message text against an immutable [`Lexicon`].
#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: Lexicon,
}

impl Classifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Maps a message to its [`Intent`]. Never fails.
    ///
    /// The canonical-pattern check runs on the original text with only the
    /// decimal separator unified; case folding and accent folding apply only
    /// to the keyword comparisons afterwards.
    pub fn classify(&self, message: &Message) -> Intent {
        if message.is_system_reply() {
            return Intent::SystemReply;
        }
        if message.is_blank() {
            return Intent::Empty;
        }
        if let Ok(tx) = message.raw().trim().parse::<Transaction>() {
            return Intent::Transaction(tx);
        }
        let normalized = message.normalized();
        if normalized == self.lexicon.daily_outcome() {
            Intent::DailyOutcome
        } else if normalized == self.lexicon.balance() {
            Intent::Balance
        } else if normalized == self.lexicon.reset() {
            Intent::Reset
        } else if normalized == self.lexicon.detailed_balance() {
            Intent::DetailedBalance
        } else {
            Intent::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::REPLY_PREFIX;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn classify(text: &str) -> Intent {
        Classifier::new(Lexicon::default()).classify(&Message::new(text))
    }

    #[test]
    fn empty_text_is_empty() {
        assert_eq!(classify(""), Intent::Empty);
        assert_eq!(classify("   "), Intent::Empty);
    }

    #[test]
    fn system_prefix_wins_over_everything() {
        assert_eq!(classify(&format!("{REPLY_PREFIX}saldo")), Intent::SystemReply);
        assert_eq!(
            classify(&format!("{REPLY_PREFIX}-30 / cerveja")),
            Intent::SystemReply
        );
    }

    #[test]
    fn canonical_text_is_a_transaction() {
        let intent = classify("-30.5 / cerveja");
        let Intent::Transaction(tx) = intent else {
            panic!("expected a transaction, got {intent:?}");
        };
        assert_eq!(tx.amount(), Decimal::from_str("-30.5").unwrap());
        assert_eq!(tx.description(), "cerveja");
    }

    #[test]
    fn decimal_comma_still_classifies_as_transaction() {
        let intent = classify("100,00 / vendi algo");
        let Intent::Transaction(tx) = intent else {
            panic!("expected a transaction, got {intent:?}");
        };
        assert_eq!(tx.amount(), Decimal::from_str("100.00").unwrap());
    }

    #[test]
    fn query_keywords() {
        assert_eq!(classify("diario"), Intent::DailyOutcome);
        assert_eq!(classify("saldo"), Intent::Balance);
        assert_eq!(classify("zerar"), Intent::Reset);
        assert_eq!(classify("notas"), Intent::DetailedBalance);
    }

    #[test]
    fn keywords_fold_case_and_accents() {
        assert_eq!(classify("Diário"), Intent::DailyOutcome);
        assert_eq!(classify("SALDO"), Intent::Balance);
    }

    #[test]
    fn anything_else_is_unrecognized() {
        assert_eq!(classify("oi"), Intent::Unrecognized);
        assert_eq!(classify("comprei uma cerveja 30 reais"), Intent::Unrecognized);
    }

    #[test]
    fn classification_is_total_over_odd_input() {
        for text in ["/", " / ", "30 /", "ção à é", "🦀", "-"] {
            let _ = classify(text);
        }
    }
}

//! Heuristic extraction of transactions from free-form chat text.
//!
//! When a message is not already in the canonical `<amount> / <description>`
//! form, the interpreter looks for a spending or earning keyword sequence and
//! a numeric token, and synthesizes a signed [`Transaction`] from them.
//! Everything here is best-effort: any miss returns `None` and the message
//! falls through to the invalid-message reply.

use crate::model::{fold_accents, Lexicon, Transaction};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Turns natural language into transactions using an immutable [`Lexicon`].
#[derive(Debug, Clone)]
pub struct Interpreter {
    lexicon: Lexicon,
}

impl Interpreter {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Attempts to read `text` as a transaction.
    ///
    /// Rules, in order:
    /// 1. reserved query words are never transactions;
    /// 2. an outflow keyword sequence marks spending, an inflow sequence
    ///    marks income, outflow winning when both appear; no keyword means
    ///    no transaction, regardless of any digits in the text;
    /// 3. the first numeric token is the amount, an adjacent currency unit
    ///    and a directly preceding preposition are consumed with it;
    /// 4. for outflows the keyword sequence and stray articles are dropped
    ///    from the description; for inflows the wording is kept as-is.
    pub fn interpret(&self, text: &str) -> Option<Transaction> {
        let normalized = fold_accents(&text.trim().to_lowercase());
        if self.lexicon.is_reserved(&normalized) {
            return None;
        }
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let outflow = self
            .lexicon
            .outflow_sequences()
            .iter()
            .find_map(|seq| find_sequence(&tokens, seq).map(|at| (at, seq.len())));
        let inflow = self
            .lexicon
            .inflow_sequences()
            .iter()
            .any(|seq| find_sequence(&tokens, seq).is_some());
        if outflow.is_none() && !inflow {
            return None;
        }

        let (amount_idx, amount) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, token)| numeric_value(token).map(|value| (i, value)))?;

        let mut keep = vec![true; tokens.len()];
        keep[amount_idx] = false;
        if amount_idx > 0 && self.lexicon.is_preposition(tokens[amount_idx - 1]) {
            keep[amount_idx - 1] = false;
        }
        if amount_idx + 1 < tokens.len() && self.lexicon.is_unit(tokens[amount_idx + 1]) {
            keep[amount_idx + 1] = false;
        }
        if let Some((at, len)) = outflow {
            for slot in keep.iter_mut().skip(at).take(len) {
                *slot = false;
            }
            for (i, token) in tokens.iter().enumerate() {
                if self.lexicon.is_article(token) {
                    keep[i] = false;
                }
            }
        }

        let description = tokens
            .iter()
            .zip(&keep)
            .filter_map(|(token, keep)| keep.then_some(*token))
            .collect::<Vec<_>>()
            .join(" ");

        let signed = if outflow.is_some() { -amount } else { amount };
        Some(Transaction::new(signed, description))
    }
}

/// The position of the first occurrence of `sequence` as consecutive tokens.
fn find_sequence(tokens: &[&str], sequence: &[String]) -> Option<usize> {
    if sequence.is_empty() || sequence.len() > tokens.len() {
        return None;
    }
    (0..=tokens.len() - sequence.len())
        .find(|&start| sequence.iter().zip(&tokens[start..]).all(|(s, t)| s == t))
}

/// Parses a token that starts with digits as an amount, tolerating a glued
/// suffix such as `30reais`. Comma and dot both work as decimal separators.
fn numeric_value(token: &str) -> Option<Decimal> {
    let numeric_len = token
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != ',')
        .unwrap_or(token.len());
    let numeric = &token[..numeric_len];
    if numeric.is_empty() || !numeric.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&numeric.replace(',', ".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lexicon;

    fn interpret(text: &str) -> Option<Transaction> {
        Interpreter::new(Lexicon::default()).interpret(text)
    }

    #[test]
    fn outflow_strips_keyword_and_articles() {
        let tx = interpret("comprei uma cerveja 30 reais").unwrap();
        assert_eq!(tx.to_string(), "-30 / cerveja");
    }

    #[test]
    fn inflow_keeps_the_wording() {
        let tx = interpret("vendi um produto por 200 reais").unwrap();
        assert_eq!(tx.to_string(), "200 / vendi um produto");
    }

    #[test]
    fn small_talk_is_rejected() {
        assert!(interpret("oi").is_none());
    }

    #[test]
    fn digits_without_keywords_are_rejected() {
        assert!(interpret("faltam 3 dias").is_none());
    }

    #[test]
    fn reserved_words_are_rejected() {
        for word in ["diario", "saldo", "zerar", "notas"] {
            assert!(interpret(word).is_none(), "{word} must not interpret");
        }
    }

    #[test]
    fn keyword_without_amount_is_rejected() {
        assert!(interpret("comprei umas coisas").is_none());
    }

    #[test]
    fn multi_word_keyword_sequence() {
        let tx = interpret("fiz um pix de 50 pra maria").unwrap();
        assert_eq!(tx.to_string(), "-50 / pra maria");
    }

    #[test]
    fn only_the_first_numeric_token_counts() {
        let tx = interpret("paguei 12,50 no estacionamento as 18").unwrap();
        assert_eq!(tx.amount().to_string(), "-12.50");
        assert!(tx.description().contains("18"));
    }

    #[test]
    fn outflow_wins_when_both_directions_match() {
        let tx = interpret("recebi e paguei 10 reais conta").unwrap();
        assert!(tx.is_outflow());
    }

    #[test]
    fn accented_keyword_matches() {
        let tx = interpret("fiz um depósito de 300").unwrap();
        assert_eq!(tx.amount().to_string(), "300");
    }

    #[test]
    fn glued_unit_suffix() {
        let tx = interpret("gastei 25reais no mercado").unwrap();
        assert_eq!(tx.amount().to_string(), "-25");
    }
}

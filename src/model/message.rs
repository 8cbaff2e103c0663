//! A single transcript message and the fixed reply strings.
//!
//! Every reply the bot writes back into the transcript starts with
//! [`REPLY_PREFIX`]. The prefix is the visual marker that a line came from
//! the bot; the window resolver relies on the explicit origin tag, and the
//! classifier additionally skips any prefixed line it is handed.

/// The literal prefix carried by every bot-authored reply.
pub const REPLY_PREFIX: &str = "sys: ";

/// Reply used when a ledger read or write fails.
pub const SYSTEM_ERROR_REPLY: &str = "sys: system error";

/// Reply for an empty cell, a zero running total.
pub const ZERO_BALANCE_REPLY: &str = "sys: R$ 0,00";

/// Reply echoing a message that matched no intent.
pub fn invalid_reply(original: &str) -> String {
    format!("{REPLY_PREFIX}invalid message: {original}")
}

/// One unit of transcript text, constructed per visible line at read time and
/// discarded once the pipeline has produced a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    raw: String,
}

impl Message {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The original text, preserved for amount extraction and error echoes.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True when the text carries the reserved bot-reply prefix.
    pub fn is_system_reply(&self) -> bool {
        self.raw.starts_with(REPLY_PREFIX)
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// The keyword-matching form: trimmed, lowercased, accents folded.
    ///
    /// Never applied to canonical transaction text, which only gets decimal
    /// unification; the classifier checks the canonical pattern first.
    pub fn normalized(&self) -> String {
        fold_accents(&self.raw.trim().to_lowercase())
    }
}

/// Folds the accented spellings that show up in pt-BR keywords, so that
/// "diário" and "diario" classify the same way.
pub(crate) fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_not_a_system_reply() {
        assert!(!Message::new("").is_system_reply());
    }

    #[test]
    fn transaction_text_is_not_a_system_reply() {
        assert!(!Message::new("-5,00 / mercado").is_system_reply());
    }

    #[test]
    fn prefixed_text_is_a_system_reply() {
        assert!(Message::new(format!("{REPLY_PREFIX}processed -5 / mercado")).is_system_reply());
    }

    #[test]
    fn normalized_folds_case_and_accents() {
        assert_eq!(Message::new("Diário").normalized(), "diario");
        assert_eq!(Message::new("  SALDO ").normalized(), "saldo");
    }

    #[test]
    fn blank_detection() {
        assert!(Message::new("   ").is_blank());
        assert!(!Message::new("oi").is_blank());
    }

    #[test]
    fn invalid_reply_echoes_original() {
        assert_eq!(invalid_reply("oi"), "sys: invalid message: oi");
    }
}

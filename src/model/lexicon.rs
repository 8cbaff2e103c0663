//! The keyword tables driving classification and interpretation.
//!
//! Held as immutable data and handed to the classifier and the interpreter at
//! construction time, so a different locale or a trimmed keyword set can be
//! swapped in without touching either algorithm. The default tables are the
//! pt-BR vocabulary the bot ships with.

/// Immutable keyword configuration. All entries are expected in normalized
/// form: lowercase, accents folded.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// The exact-match query words, in classification order.
    daily_outcome: String,
    balance: String,
    reset: String,
    detailed_balance: String,
    /// Multi-word sequences that mark a message as spending money.
    outflow: Vec<Vec<String>>,
    /// Multi-word sequences that mark a message as receiving money.
    inflow: Vec<Vec<String>>,
    /// Prepositions dropped when they directly precede the amount.
    prepositions: Vec<String>,
    /// Currency-unit words dropped when they directly follow the amount.
    units: Vec<String>,
    /// Articles dropped from outflow descriptions.
    articles: Vec<String>,
}

impl Lexicon {
    pub fn daily_outcome(&self) -> &str {
        &self.daily_outcome
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn reset(&self) -> &str {
        &self.reset
    }

    pub fn detailed_balance(&self) -> &str {
        &self.detailed_balance
    }

    /// True when the normalized text is one of the reserved query words.
    pub fn is_reserved(&self, normalized: &str) -> bool {
        normalized == self.daily_outcome
            || normalized == self.balance
            || normalized == self.reset
            || normalized == self.detailed_balance
    }

    pub fn outflow_sequences(&self) -> &[Vec<String>] {
        &self.outflow
    }

    pub fn inflow_sequences(&self) -> &[Vec<String>] {
        &self.inflow
    }

    pub fn is_preposition(&self, token: &str) -> bool {
        self.prepositions.iter().any(|p| p == token)
    }

    pub fn is_unit(&self, token: &str) -> bool {
        self.units.iter().any(|u| u == token)
    }

    pub fn is_article(&self, token: &str) -> bool {
        self.articles.iter().any(|a| a == token)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        fn seqs(entries: &[&str]) -> Vec<Vec<String>> {
            entries
                .iter()
                .map(|e| e.split_whitespace().map(str::to_string).collect())
                .collect()
        }
        fn words(entries: &[&str]) -> Vec<String> {
            entries.iter().map(|e| e.to_string()).collect()
        }
        Self {
            daily_outcome: "diario".to_string(),
            balance: "saldo".to_string(),
            reset: "zerar".to_string(),
            detailed_balance: "notas".to_string(),
            outflow: seqs(&["comprei", "paguei", "fiz um pix", "transferi", "gastei"]),
            inflow: seqs(&[
                "recebi",
                "vendi",
                "ganhei",
                "fiz um deposito",
                "pix recebido",
            ]),
            prepositions: words(&["de", "por", "para", "pra"]),
            units: words(&["reais", "rs", "r$"]),
            articles: words(&["o", "a", "os", "as", "um", "uma", "uns", "umas"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words() {
        let lexicon = Lexicon::default();
        for word in ["diario", "saldo", "zerar", "notas"] {
            assert!(lexicon.is_reserved(word), "{word} should be reserved");
        }
        assert!(!lexicon.is_reserved("cerveja"));
    }

    #[test]
    fn multi_word_sequences_are_split() {
        let lexicon = Lexicon::default();
        assert!(lexicon
            .outflow_sequences()
            .iter()
            .any(|s| s == &["fiz", "um", "pix"]));
        assert!(lexicon
            .inflow_sequences()
            .iter()
            .any(|s| s == &["pix", "recebido"]));
    }
}

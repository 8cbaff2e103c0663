//! Optional natural-language formatting assistant.
//!
//! When enabled, raw chat text is offered to a local LLM before any other
//! handling. The model is asked to answer with either a canonical
//! transaction string or the word "false". Whatever comes back is validated
//! against the canonical grammar; an answer that parses is trusted, anything
//! else counts as "not applicable" and the message continues down the
//! ordinary pipeline. The assistant is advisory only and never required.

use crate::config::AssistantConfig;
use crate::model::Transaction;
use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    /// Asks for a canonical rendition of `raw`. `Ok(None)` means the
    /// assistant declined; errors mean it was unreachable.
    async fn format(&self, raw: &str) -> Result<Option<Transaction>>;
}

const PROMPT: &str = "Your task is to format a text message based on whether it \
describes an income or expense transaction. Follow these rules carefully:\n\n\
1. **Expense:** If the message describes a purchase or spending action, output \
the amount as a negative number, followed by the item or description.\n   \
- Example: 'comprei uma cerveja 30 reais' -> `-30 / cerveja`\n\n\
2. **Income:** If the message describes earning or receiving money, output the \
amount as a positive number, followed by the description.\n   \
- Example: 'vendi um produto por 200 reais' -> `200 / vendi um produto`\n\n\
3. **Invalid message:** If the input does not clearly describe a valid \
transaction with an amount, or if the input is one of the following: \"diario\", \
\"notas\", \"zerar\", or \"saldo\", return `false`.\n\n\
Process the following input message: **'{input}'**\n\n\
Return only the formatted result, without explanations or additional text.";

/// Talks to an Ollama server's `/api/generate` endpoint.
pub struct OllamaAssistant {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaAssistant {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Assistant for OllamaAssistant {
    async fn format(&self, raw: &str) -> Result<Option<Transaction>> {
        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        trace!("asking {} to format a message", self.model);
        let body = json!({
            "model": self.model,
            "prompt": PROMPT.replace("{input}", raw),
            "stream": false,
        });
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("assistant request failed")?
            .error_for_status()
            .context("assistant returned an error status")?;
        let generated: GenerateResponse = response
            .json()
            .await
            .context("assistant response was not valid JSON")?;

        let answer = generated.response.trim().trim_matches('`').trim();
        if answer.eq_ignore_ascii_case("false") {
            return Ok(None);
        }
        match answer.parse::<Transaction>() {
            Ok(tx) => Ok(Some(tx)),
            Err(_) => {
                debug!("assistant answer did not match the canonical form: '{answer}'");
                Ok(None)
            }
        }
    }
}

//! Configuration file handling.
//!
//! The configuration lives in a single JSON file, by default at
//! `<user config dir>/sheetbot/config.json`. It names the ledger sheet, the
//! Google OAuth credentials, the transcript bridge and the optional
//! formatting assistant.

use crate::{utils, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_DIR: &str = "sheetbot";
const CONFIG_JSON: &str = "config.json";

/// The loaded, validated configuration. The spreadsheet id is extracted from
/// the sheet URL and the bridge URL is parsed up front, so a malformed config
/// fails at startup instead of in the middle of a poll cycle.
#[derive(Debug, Clone)]
pub struct Config {
    file: ConfigFile,
    spreadsheet_id: String,
    bridge_url: Url,
}

impl Config {
    /// Loads and validates the config file at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let file: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("cannot load config from {}", path.display()))?;
        let spreadsheet_id = extract_spreadsheet_id(&file.sheet_url)?;
        let bridge_url = Url::parse(&file.bridge.base_url)
            .with_context(|| format!("bridge base_url '{}' is not a URL", file.bridge.base_url))?;
        Ok(Self {
            file,
            spreadsheet_id,
            bridge_url,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn google(&self) -> &GoogleAuth {
        &self.file.google
    }

    pub fn bridge_url(&self) -> &Url {
        &self.bridge_url
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.file.bridge.poll_interval_secs)
    }

    pub fn assistant(&self) -> Option<&AssistantConfig> {
        self.file.assistant.as_ref()
    }

    pub fn serve_bind(&self) -> &str {
        &self.file.serve.bind
    }
}

/// The default config file location, `<user config dir>/sheetbot/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_JSON)
}

/// The on-disk shape of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    /// The URL of the ledger Google Sheet, e.g.
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    sheet_url: String,
    google: GoogleAuth,
    bridge: BridgeConfig,
    #[serde(default)]
    assistant: Option<AssistantConfig>,
    #[serde(default)]
    serve: ServeConfig,
}

/// OAuth client credentials plus a long-lived refresh token; access tokens
/// are minted from these on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuth {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Where the transcript bridge listens and how often to poll it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BridgeConfig {
    base_url: String,
    #[serde(default = "default_poll_interval")]
    poll_interval_secs: u64,
}

/// The optional natural-language formatting assistant. Present means
/// enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// The Ollama generate endpoint, e.g. http://localhost:11434/api/generate
    pub url: String,
    pub model: String,
}

/// Bind address for the `serve` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServeConfig {
    #[serde(default = "default_bind")]
    bind: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_poll_interval() -> u64 {
    2
}

fn default_bind() -> String {
    "127.0.0.1:8420".to_string()
}

/// Pulls the spreadsheet id out of a Google Sheets URL: the path segment
/// following `/d/`.
fn extract_spreadsheet_id(sheet_url: &str) -> Result<String> {
    let url = Url::parse(sheet_url)
        .with_context(|| format!("sheet_url '{sheet_url}' is not a URL"))?;
    let mut segments = url
        .path_segments()
        .ok_or_else(|| anyhow!("sheet_url '{sheet_url}' has no path"))?;
    segments
        .by_ref()
        .find(|segment| *segment == "d")
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("sheet_url '{sheet_url}' does not contain a spreadsheet id"))
}

//! The CLI interface for the sheetbot binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// sheetbot: a chat bot that keeps a Google Sheet ledger.
///
/// The bot watches a group conversation through a transcript bridge,
/// understands short expense and income messages ("comprei uma cerveja 30
/// reais", "-30 / cerveja") and records them into a per-day ledger sheet,
/// answering in the chat with what it did. A handful of keywords query the
/// ledger: "diario", "saldo", "notas" and "zerar".
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Path to the config file. Defaults to config.json in the sheetbot
    /// directory under the platform config dir.
    #[arg(long, env = "SHEETBOT_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::default_config_path)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Watch the chat transcript and reply to new messages until terminated.
    Run,

    /// Serve the reply pipeline as an HTTP endpoint (POST /message).
    Serve(ServeArgs),

    /// Ask the ledger a read-only question from the command line.
    Query(QueryArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The address to bind, e.g. 127.0.0.1:8420. Overrides the config file.
    #[arg(long)]
    bind: Option<String>,
}

impl ServeArgs {
    pub fn bind(&self) -> Option<&str> {
        self.bind.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// Which question to ask.
    #[arg(value_enum)]
    what: QueryKind,
}

impl QueryArgs {
    pub fn what(&self) -> QueryKind {
        self.what
    }
}

/// The read-only ledger queries, named after their chat keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    /// Today's accumulated spending.
    Diario,
    /// The current running balance.
    Saldo,
    /// Today's audit-trail lines.
    Notas,
}

mod assistant;
pub mod args;
mod bot;
pub mod commands;
mod config;
mod error;
mod interpret;
mod ledger;
mod model;
mod transcript;
mod utils;

pub use assistant::{Assistant, OllamaAssistant};
pub use bot::Bot;
pub use config::{AssistantConfig, Config, GoogleAuth};
pub use error::Error;
pub use error::Result;
pub use interpret::Interpreter;
pub use ledger::{day_cells, CellContent, CellRef, DayCells, LedgerClient, LedgerEngine};
pub use model::{Amount, Classifier, Intent, Lexicon, Message, Transaction};
pub use transcript::{resolve_window, HttpTranscript, Line, Origin, Transcript};

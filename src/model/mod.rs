//! Domain types: money, transactions, messages and intents.

mod amount;
mod intent;
mod lexicon;
mod message;
mod transaction;

pub use amount::Amount;
pub use intent::{Classifier, Intent};
pub use lexicon::Lexicon;
pub use message::{invalid_reply, Message, REPLY_PREFIX, SYSTEM_ERROR_REPLY, ZERO_BALANCE_REPLY};
pub use transaction::{ParseTransactionError, Transaction};

pub(crate) use message::fold_accents;

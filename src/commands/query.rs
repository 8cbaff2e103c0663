use crate::args::QueryKind;
use crate::commands::Out;
use crate::ledger::{GoogleLedger, LedgerEngine};
use crate::{Config, Result};

/// One-shot command-line access to the read-only ledger operations, the same
/// ones the chat keywords reach.
pub async fn query(config: Config, what: QueryKind) -> Result<Out> {
    let engine = LedgerEngine::new(GoogleLedger::new(&config));
    let reply = match what {
        QueryKind::Diario => engine.daily_outcome().await?,
        QueryKind::Saldo => engine.balance().await?,
        QueryKind::Notas => engine.detailed_balance().await?,
    };
    Ok(Out::new(reply))
}

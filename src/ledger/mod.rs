//! The ledger: cell addressing, the backend client trait and the update
//! engine that keeps values and audit notes in step.

mod address;
mod engine;
mod google;
#[cfg(test)]
mod memory;

pub use address::{column_letters, day_cells, CellRef, DayCells, COLUMNS_PER_MONTH};
pub use engine::LedgerEngine;
pub use google::GoogleLedger;

#[cfg(test)]
pub(crate) use memory::TestLedger;

use crate::Result;

/// What one ledger cell holds: a displayed value and its audit note. Both
/// strings are empty when the cell is untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellContent {
    pub value: String,
    pub note: String,
}

/// The spreadsheet backend, reduced to the four calls the engine needs.
///
/// Implementations are external collaborators; the engine re-resolves the
/// year tab on every operation rather than caching ids, because tabs can be
/// created or replaced outside this process between calls.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    /// The backend id of the tab named after `year`, or an error when no
    /// such tab exists yet.
    async fn resolve_tab_id(&self, year: i32) -> Result<i64>;

    /// Reads a cell's displayed value and note together.
    async fn read_cell(&self, cell: &CellRef) -> Result<CellContent>;

    /// Writes a cell's displayed value.
    async fn write_value(&self, cell: &CellRef, value: &str) -> Result<()>;

    /// Replaces a cell's note. Takes the resolved tab id because note writes
    /// address the backend by grid range rather than by A1 notation.
    async fn write_note(&self, tab_id: i64, cell: &CellRef, note: &str) -> Result<()>;
}

//! An in-memory `LedgerClient` so the engine and the reply pipeline can be
//! exercised top-to-bottom without touching Google Sheets.

use crate::ledger::{CellContent, CellRef, LedgerClient};
use crate::Result;
use anyhow::bail;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Holds cells keyed by their A1 range string plus the set of year tabs that
/// "exist". Construction helpers seed whatever state a test needs.
pub(crate) struct TestLedger {
    cells: Mutex<HashMap<String, CellContent>>,
    years: HashSet<i32>,
    fail_notes: bool,
}

impl TestLedger {
    pub(crate) fn with_year(year: i32) -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
            years: HashSet::from([year]),
            fail_notes: false,
        }
    }

    /// Makes every note write fail, for exercising the integrity window.
    pub(crate) fn failing_notes(mut self) -> Self {
        self.fail_notes = true;
        self
    }

    pub(crate) fn seed(&self, cell: &CellRef, value: &str, note: &str) {
        self.cells.lock().unwrap().insert(
            cell.to_string(),
            CellContent {
                value: value.to_string(),
                note: note.to_string(),
            },
        );
    }

    pub(crate) fn cell(&self, cell: &CellRef) -> CellContent {
        self.cells
            .lock()
            .unwrap()
            .get(&cell.to_string())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LedgerClient for TestLedger {
    async fn resolve_tab_id(&self, year: i32) -> Result<i64> {
        if self.years.contains(&year) {
            Ok(i64::from(year))
        } else {
            bail!("no tab named '{year}'")
        }
    }

    async fn read_cell(&self, cell: &CellRef) -> Result<CellContent> {
        Ok(self.cell(cell))
    }

    async fn write_value(&self, cell: &CellRef, value: &str) -> Result<()> {
        let mut cells = self.cells.lock().unwrap();
        cells.entry(cell.to_string()).or_default().value = value.to_string();
        Ok(())
    }

    async fn write_note(&self, _tab_id: i64, cell: &CellRef, note: &str) -> Result<()> {
        if self.fail_notes {
            bail!("note write rejected");
        }
        let mut cells = self.cells.lock().unwrap();
        cells.entry(cell.to_string()).or_default().note = note.to_string();
        Ok(())
    }
}

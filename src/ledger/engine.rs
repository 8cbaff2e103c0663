//! The update engine: read-accumulate-write against today's cells, plus the
//! read-only queries. Every operation resolves the date and the year tab
//! fresh, so the engine itself holds no state besides its client.

use crate::ledger::{day_cells, CellRef, LedgerClient};
use crate::model::{Amount, Transaction, REPLY_PREFIX, ZERO_BALANCE_REPLY};
use crate::Result;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

pub struct LedgerEngine<C> {
    client: C,
}

impl<C: LedgerClient> LedgerEngine<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Accumulates a transaction into today's income or outcome cell and
    /// appends its audit line to the cell note.
    pub async fn record(&self, tx: &Transaction) -> Result<String> {
        self.record_on(today(), tx).await
    }

    /// Today's accumulated spending, as displayed by the sheet.
    pub async fn daily_outcome(&self) -> Result<String> {
        self.read_display(day_cells(today()).outcome).await
    }

    /// The current running balance, as displayed by the sheet.
    pub async fn balance(&self) -> Result<String> {
        self.read_display(day_cells(today()).balance).await
    }

    /// Sets today's outcome back to zero, but only when there is no audit
    /// history that would silently disappear with it.
    pub async fn reset_daily_outcome(&self) -> Result<String> {
        self.reset_on(today()).await
    }

    /// Today's audit-trail lines, one reply line per recorded outflow.
    pub async fn detailed_balance(&self) -> Result<String> {
        self.detailed_on(today()).await
    }

    async fn record_on(&self, date: NaiveDate, tx: &Transaction) -> Result<String> {
        let reply = format!("{REPLY_PREFIX}processed {tx}");
        if tx.amount().is_zero() {
            debug!("zero amount, nothing to record");
            return Ok(reply);
        }

        let tab_id = self.resolve_tab(date).await?;
        let cells = day_cells(date);
        let cell = if tx.is_outflow() {
            cells.outcome
        } else {
            cells.income
        };

        let content = self.client.read_cell(&cell).await?;
        let mut current = Amount::from_sheet(&content.value)?;
        if content.note.is_empty() && tx.is_outflow() {
            // No audit trail means the displayed value is stale, typically
            // left behind by a manual reset. Start the running total over.
            current = Amount::ZERO;
        }
        let new_value = Amount::new(current.value() + tx.amount().abs());
        self.client.write_value(&cell, &new_value.plain()).await?;

        let line = tx.note_line();
        let note = if content.note.is_empty() {
            line
        } else {
            format!("{}\n{}", content.note, line)
        };
        if let Err(e) = self.client.write_note(tab_id, &cell, &note).await {
            // The value made it in but the audit line did not. The next
            // record against this cell rebuilds the note going forward.
            warn!("value written to {cell} but the note append failed: {e:#}");
            return Err(e.context("note append failed after the value write"));
        }

        debug!("recorded {} into {cell}, new total {}", tx.note_line(), new_value);
        Ok(reply)
    }

    async fn read_display(&self, cell: CellRef) -> Result<String> {
        self.resolve_tab_for(cell.year).await?;
        let content = self.client.read_cell(&cell).await?;
        if content.value.trim().is_empty() {
            Ok(ZERO_BALANCE_REPLY.to_string())
        } else {
            Ok(format!("{REPLY_PREFIX}{}", content.value))
        }
    }

    async fn reset_on(&self, date: NaiveDate) -> Result<String> {
        self.resolve_tab(date).await?;
        let cell = day_cells(date).outcome;
        let content = self.client.read_cell(&cell).await?;
        if !content.note.is_empty() {
            return Ok(format!(
                "{REPLY_PREFIX}not reset: today already has recorded notes"
            ));
        }
        self.client.write_value(&cell, "0").await?;
        Ok(format!("{REPLY_PREFIX}daily outcome set to zero"))
    }

    async fn detailed_on(&self, date: NaiveDate) -> Result<String> {
        self.resolve_tab(date).await?;
        let cell = day_cells(date).outcome;
        let content = self.client.read_cell(&cell).await?;
        if content.note.is_empty() {
            return Ok(REPLY_PREFIX.trim_end().to_string());
        }
        Ok(content
            .note
            .lines()
            .map(|line| format!("{REPLY_PREFIX}{line}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn resolve_tab(&self, date: NaiveDate) -> Result<i64> {
        use chrono::Datelike;
        self.resolve_tab_for(date.year()).await
    }

    async fn resolve_tab_for(&self, year: i32) -> Result<i64> {
        self.client
            .resolve_tab_id(year)
            .await
            .with_context(|| format!("no ledger tab for {year}"))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
impl<C> LedgerEngine<C> {
    pub(crate) fn test_client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TestLedger;

    fn engine(ledger: TestLedger) -> LedgerEngine<TestLedger> {
        LedgerEngine::new(ledger)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn outcome_cell() -> CellRef {
        day_cells(date()).outcome
    }

    fn income_cell() -> CellRef {
        day_cells(date()).income
    }

    fn tx(s: &str) -> Transaction {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn outflow_accumulates_value_and_note() {
        let engine = engine(TestLedger::with_year(2025));
        let reply = engine.record_on(date(), &tx("-30 / cerveja")).await.unwrap();
        assert_eq!(reply, "sys: processed -30 / cerveja");
        engine.record_on(date(), &tx("-12,5 / padaria")).await.unwrap();

        let cell = engine.client.cell(&outcome_cell());
        assert_eq!(cell.value, "42,50");
        assert_eq!(cell.note, "30.00 - cerveja\n12.50 - padaria");
    }

    #[tokio::test]
    async fn inflow_goes_to_the_income_cell() {
        let engine = engine(TestLedger::with_year(2025));
        engine.record_on(date(), &tx("200 / vendi um produto")).await.unwrap();

        let cell = engine.client.cell(&income_cell());
        assert_eq!(cell.value, "200,00");
        assert_eq!(cell.note, "200.00 - vendi um produto");
        assert_eq!(engine.client.cell(&outcome_cell()), Default::default());
    }

    #[tokio::test]
    async fn same_day_accumulation_is_amount_commutative() {
        let forward = engine(TestLedger::with_year(2025));
        forward.record_on(date(), &tx("-10 / a")).await.unwrap();
        forward.record_on(date(), &tx("-25,5 / b")).await.unwrap();

        let backward = engine(TestLedger::with_year(2025));
        backward.record_on(date(), &tx("-25,5 / b")).await.unwrap();
        backward.record_on(date(), &tx("-10 / a")).await.unwrap();

        let f = forward.client.cell(&outcome_cell());
        let b = backward.client.cell(&outcome_cell());
        assert_eq!(f.value, b.value);
        // The audit trail still reflects call order.
        assert_eq!(f.note, "10.00 - a\n25.50 - b");
        assert_eq!(b.note, "25.50 - b\n10.00 - a");
    }

    #[tokio::test]
    async fn zero_amount_is_a_no_op() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&outcome_cell(), "10,00", "10.00 - antes");
        let engine = engine(ledger);
        let reply = engine.record_on(date(), &tx("0 / nada")).await.unwrap();
        assert!(reply.starts_with(REPLY_PREFIX));

        let cell = engine.client.cell(&outcome_cell());
        assert_eq!(cell.value, "10,00");
        assert_eq!(cell.note, "10.00 - antes");
    }

    #[tokio::test]
    async fn stale_value_without_note_restarts_the_outflow_total() {
        let ledger = TestLedger::with_year(2025);
        // A manual reset cleared the note but a value survived.
        ledger.seed(&outcome_cell(), "R$ 99,00", "");
        let engine = engine(ledger);
        engine.record_on(date(), &tx("-30 / cerveja")).await.unwrap();
        assert_eq!(engine.client.cell(&outcome_cell()).value, "30,00");
    }

    #[tokio::test]
    async fn income_without_note_still_accumulates() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&income_cell(), "100,00", "");
        let engine = engine(ledger);
        engine.record_on(date(), &tx("50 / extra")).await.unwrap();
        assert_eq!(engine.client.cell(&income_cell()).value, "150,00");
    }

    #[tokio::test]
    async fn formatted_cell_values_parse_before_accumulating() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&outcome_cell(), "R$ 1.000,00", "1000.00 - aluguel");
        let engine = engine(ledger);
        engine.record_on(date(), &tx("-30 / cerveja")).await.unwrap();
        assert_eq!(engine.client.cell(&outcome_cell()).value, "1030,00");
    }

    #[tokio::test]
    async fn missing_year_tab_is_an_error() {
        let engine = engine(TestLedger::with_year(1999));
        let err = engine.record_on(date(), &tx("-30 / cerveja")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn note_write_failure_surfaces_after_the_value_write() {
        let ledger = TestLedger::with_year(2025).failing_notes();
        let engine = engine(ledger);
        let err = engine.record_on(date(), &tx("-30 / cerveja")).await;
        assert!(err.is_err());
        // The value write has already happened; the inconsistency is the
        // documented integrity window, not a rollback.
        assert_eq!(engine.client.cell(&outcome_cell()).value, "30,00");
    }

    #[tokio::test]
    async fn reset_refuses_while_notes_exist() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&outcome_cell(), "30,00", "30.00 - cerveja");
        let engine = engine(ledger);
        let reply = engine.reset_on(date()).await.unwrap();
        assert_eq!(reply, "sys: not reset: today already has recorded notes");
        assert_eq!(engine.client.cell(&outcome_cell()).value, "30,00");
    }

    #[tokio::test]
    async fn reset_zeroes_a_noteless_cell() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&outcome_cell(), "99,00", "");
        let engine = engine(ledger);
        let reply = engine.reset_on(date()).await.unwrap();
        assert_eq!(reply, "sys: daily outcome set to zero");
        let cell = engine.client.cell(&outcome_cell());
        assert_eq!(cell.value, "0");
        assert_eq!(cell.note, "");
    }

    #[tokio::test]
    async fn detailed_balance_prefixes_every_note_line() {
        let ledger = TestLedger::with_year(2025);
        ledger.seed(&outcome_cell(), "42,50", "30.00 - cerveja\n12.50 - padaria");
        let engine = engine(ledger);
        let reply = engine.detailed_on(date()).await.unwrap();
        assert_eq!(reply, "sys: 30.00 - cerveja\nsys: 12.50 - padaria");
    }

    #[tokio::test]
    async fn detailed_balance_without_notes_is_just_the_prefix() {
        let engine = engine(TestLedger::with_year(2025));
        assert_eq!(engine.detailed_on(date()).await.unwrap(), "sys:");
    }
}

//! Pure cell addressing for the ledger sheet layout.
//!
//! One tab per calendar year, named by the year number. Within a tab each
//! month owns a fixed block of [`COLUMNS_PER_MONTH`] columns; counting from
//! the end of the block, fixed offsets locate the income, daily-outcome and
//! balance columns. Each day is one row below a two-row header. The whole
//! mapping is a function of the date, nothing is stored.

use crate::Result;
use anyhow::{anyhow, bail};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Width of one month's column block.
pub const COLUMNS_PER_MONTH: u32 = 6;

/// Rows reserved for the header above day 1.
const HEADER_ROWS: u32 = 2;

/// Offsets, counted back from the end of the month block, of the three
/// meaningful columns. Income and outcome land one column to the right of
/// their label column, balance sits in its label column.
const INCOME_OFFSET: u32 = 4;
const OUTCOME_OFFSET: u32 = 2;
const BALANCE_OFFSET: u32 = 1;

/// A single cell in the ledger: year tab, 1-based column, 1-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub year: i32,
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    /// Zero-based row index for grid-range requests.
    pub fn grid_row(&self) -> u32 {
        self.row - 1
    }

    /// Zero-based column index for grid-range requests.
    pub fn grid_col(&self) -> u32 {
        self.col - 1
    }
}

/// Renders the A1-notation range, e.g. `2025!E17`.
impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.year, column_letters(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (tab, cell) = s
            .split_once('!')
            .ok_or_else(|| anyhow!("range '{s}' is missing the tab separator"))?;
        let year: i32 = tab.parse().map_err(|_| anyhow!("tab '{tab}' is not a year"))?;
        let letters_len = cell.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        if letters_len == 0 || letters_len == cell.len() {
            bail!("cell '{cell}' is not in A1 notation");
        }
        let col = letters_to_column(&cell[..letters_len])?;
        let row: u32 = cell[letters_len..]
            .parse()
            .map_err(|_| anyhow!("row in '{cell}' is not a number"))?;
        if row == 0 {
            bail!("row in '{cell}' must be 1-based");
        }
        Ok(Self { year, col, row })
    }
}

/// The three cells that matter for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCells {
    pub income: CellRef,
    pub outcome: CellRef,
    pub balance: CellRef,
}

/// Resolves the income, outcome and balance cells for `date`.
pub fn day_cells(date: NaiveDate) -> DayCells {
    let year = date.year();
    let block_end = date.month() * COLUMNS_PER_MONTH;
    let row = date.day() + HEADER_ROWS;
    let cell = |col| CellRef { year, col, row };
    DayCells {
        income: cell(block_end - INCOME_OFFSET),
        outcome: cell(block_end - OUTCOME_OFFSET),
        balance: cell(block_end - BALANCE_OFFSET),
    }
}

/// Standard spreadsheet column naming for a 1-based index: A..Z, AA, AB...
pub fn column_letters(mut col: u32) -> String {
    debug_assert!(col > 0);
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn letters_to_column(letters: &str) -> Result<u32> {
    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            bail!("column letters '{letters}' must be uppercase A-Z");
        }
        col = col * 26 + (c as u32 - 'A' as u32 + 1);
    }
    Ok(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn january_columns() {
        let cells = day_cells(date(2025, 1, 1));
        assert_eq!(cells.income.to_string(), "2025!B3");
        assert_eq!(cells.outcome.to_string(), "2025!D3");
        assert_eq!(cells.balance.to_string(), "2025!E3");
    }

    #[test]
    fn three_distinct_columns_share_the_row() {
        let cells = day_cells(date(2024, 3, 15));
        assert_eq!(cells.income.row, cells.outcome.row);
        assert_eq!(cells.outcome.row, cells.balance.row);
        assert_eq!(cells.income.row, 17);
        assert_ne!(cells.income.col, cells.outcome.col);
        assert_ne!(cells.outcome.col, cells.balance.col);
        assert_ne!(cells.income.col, cells.balance.col);
    }

    #[test]
    fn addressing_is_pure() {
        let d = date(2024, 3, 15);
        assert_eq!(day_cells(d), day_cells(d));
    }

    #[test]
    fn december_stays_inside_its_block() {
        let cells = day_cells(date(2025, 12, 31));
        assert_eq!(cells.balance.col, 12 * COLUMNS_PER_MONTH - 1);
        assert!(cells.income.col > 11 * COLUMNS_PER_MONTH);
        assert_eq!(cells.balance.row, 33);
    }

    #[test]
    fn column_letter_encoding() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(53), "BA");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn range_round_trip() {
        for cell in [
            CellRef { year: 2025, col: 1, row: 1 },
            CellRef { year: 2024, col: 28, row: 17 },
            CellRef { year: 1999, col: 702, row: 33 },
        ] {
            let parsed: CellRef = cell.to_string().parse().unwrap();
            assert_eq!(parsed, cell);
        }
    }

    #[test]
    fn range_parse_rejects_garbage() {
        assert!("B3".parse::<CellRef>().is_err());
        assert!("2025!3".parse::<CellRef>().is_err());
        assert!("2025!B".parse::<CellRef>().is_err());
        assert!("2025!B0".parse::<CellRef>().is_err());
        assert!("year!B3".parse::<CellRef>().is_err());
    }
}

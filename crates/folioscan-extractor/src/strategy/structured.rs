//! Positional cell mapping for tabular holdings rows.

use folioscan_core::HoldingRecord;

use super::RecordStrategy;
use crate::fragment::RawFragment;
use crate::numeric::{parse_amount_with_percentage, parse_numeric_cell, parse_percentage};

/// Fewest cells a row must expose to be mapped positionally.
const MIN_CELLS: usize = 7;

/// Maps table cells to fields by position.
///
/// Column contract, after the name (and optional symbol) cell:
/// quantity, average price, current price, invested value, current value,
/// day change, profit/loss. A trailing profit/loss cell is optional; when
/// absent the value is derived.
pub(crate) struct StructuredCellStrategy;

impl RecordStrategy for StructuredCellStrategy {
    fn name(&self) -> &'static str {
        "structured_cells"
    }

    fn extract(&self, fragment: &RawFragment) -> Option<HoldingRecord> {
        let cells = &fragment.cells;
        if cells.len() < MIN_CELLS {
            return None;
        }

        let mut record = HoldingRecord::empty();

        let name_cell = cells[0].trim();
        if parse_numeric_cell(name_cell).is_none() && !name_cell.is_empty() {
            record.name = Some(name_cell.to_string());
        }

        // Some tables insert a symbol column between name and quantity.
        let mut offset = 1;
        if cells.len() > MIN_CELLS
            && parse_numeric_cell(&cells[1]).is_none()
            && !cells[1].trim().is_empty()
        {
            record.symbol = Some(cells[1].trim().to_string());
            offset = 2;
        }

        if cells.len() < offset + 5 {
            return None;
        }

        // The first three numeric columns are mandatory; a row where they do
        // not parse is not following this contract.
        record.units = parse_numeric_cell(&cells[offset])?;
        record.average_buy_price = parse_numeric_cell(&cells[offset + 1])?;
        record.current_price = parse_numeric_cell(&cells[offset + 2])?;

        record.invested_value = parse_numeric_cell(&cells[offset + 3]).unwrap_or(0.0);
        record.current_value = parse_numeric_cell(&cells[offset + 4]).unwrap_or(0.0);

        if let Some(cell) = cells.get(offset + 5) {
            record.day_change_percentage = day_change_pct(cell);
        }
        if let Some(cell) = cells.get(offset + 6) {
            record.profit_loss = parse_numeric_cell(cell).unwrap_or(0.0);
        }

        Some(record)
    }
}

/// Reads the percentage out of a day-change cell. The cell may carry
/// `"77.00 (1.12%)"`, a bare `"1.12%"`, or just the rupee amount, in which
/// case no percentage is known.
fn day_change_pct(cell: &str) -> f64 {
    if let Some((_, pct)) = parse_amount_with_percentage(cell) {
        return pct;
    }
    if cell.contains('%') {
        return parse_percentage(cell).unwrap_or(0.0);
    }
    0.0
}

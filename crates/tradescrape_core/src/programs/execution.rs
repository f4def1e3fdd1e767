use tradescrape_logging::{scrape_debug, scrape_trace, scrape_warn};

use crate::error::ExtractError;
use crate::event::Attributes;
use crate::phrases::{
    EXEC_COL_BRAND, EXEC_COL_FILL_PRICE, EXEC_COL_FILL_QUANTITY, EXEC_COL_FILL_TIME,
    EXEC_COL_ORDER_ID, EXEC_COL_STATUS, EXEC_COL_TRADE, EXEC_COMPLETE, EXEC_FILL_MARKER,
    EXEC_HEADER_ROWS, EXEC_HEADING, EXEC_NO_ORDERS, EXEC_TABLE_ORDINAL, EXEC_TIMESTAMP_LEN,
    EXEC_TRADE_KINDS,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::{ExchangeTag, ExecutionHistoryEntry, Fill, OrderKind};
use crate::table::{HeaderRow, Row, TableCounter, TableSignal, TableWalker};
use crate::text::{contains_any, find_code, first_line, parse_count, parse_price, PRICE_SENTINEL};

const PROGRAM: &str = "execution history";

#[derive(Debug, Clone, Default)]
enum ExecStep {
    #[default]
    SeekHeading,
    CountTables(TableCounter),
    InTable {
        walker: TableWalker,
        /// Order header first, then the per-fill header.
        headers: Vec<HeaderRow>,
    },
    Done(Result<(), ExtractError>),
}

/// Today's order list on the PC site: one order row followed by its fill rows.
#[derive(Debug, Clone, Default)]
pub struct ExecutionHistoryProgram {
    step: ExecStep,
    cursor: TagCursor,
    pending: Option<ExecutionHistoryEntry>,
    entries: Vec<ExecutionHistoryEntry>,
}

/// `MM/DDHH:MM:SS` to `MM/DD HH:MM:SS`; None for anything else.
fn normalize_timestamp(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.chars().count() != EXEC_TIMESTAMP_LEN || !compact.is_ascii() {
        return None;
    }
    let (date, time) = compact.split_at(5);
    Some(format!("{date} {time}"))
}

fn trade_kind(text: &str) -> Result<(OrderKind, bool), ExtractError> {
    EXEC_TRADE_KINDS
        .iter()
        .find(|(phrase, _, _)| text.contains(phrase))
        .map(|(_, kind, leveraged)| (*kind, *leveraged))
        .ok_or_else(|| ExtractError::UnknownTradeKind {
            text: text.to_string(),
        })
}

impl ExecutionHistoryProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn order_row(header: &HeaderRow, row: &Row) -> Result<ExecutionHistoryEntry, ExtractError> {
        header.check_shape(row)?;
        let brand = row.cell(header.require(EXEC_COL_BRAND)?);
        let code = find_code(brand);
        if code == 0 {
            return Err(ExtractError::InvalidCode {
                text: brand.to_string(),
            });
        }
        let (order_kind, leveraged) = trade_kind(row.cell(header.require(EXEC_COL_TRADE)?))?;
        let display_id = header
            .lookup(row, EXEC_COL_ORDER_ID)
            .and_then(|text| first_line(text).parse().ok())
            .unwrap_or(-1);
        let complete = header
            .lookup(row, EXEC_COL_STATUS)
            .is_some_and(|status| contains_any(status, EXEC_COMPLETE));
        Ok(ExecutionHistoryEntry {
            display_id,
            order_kind,
            exchange_tag: ExchangeTag::from_text(brand),
            code,
            leveraged,
            complete,
            fills: Vec::new(),
        })
    }

    /// Ok(None) for a fill whose timestamp is malformed.
    fn fill_row(header: &HeaderRow, row: &Row) -> Result<Option<Fill>, ExtractError> {
        header.check_shape(row)?;
        let Some(timestamp) = normalize_timestamp(row.cell(header.require(EXEC_COL_FILL_TIME)?))
        else {
            scrape_trace!("fill row skipped, timestamp {:?}", row.cells());
            return Ok(None);
        };
        Ok(Some(Fill {
            timestamp,
            quantity: header
                .lookup(row, EXEC_COL_FILL_QUANTITY)
                .map_or(0, parse_count),
            price: header
                .lookup(row, EXEC_COL_FILL_PRICE)
                .map_or(PRICE_SENTINEL, parse_price),
        }))
    }

    fn on_row(&mut self, row: Row) {
        if row.is_empty() {
            return;
        }
        let ExecStep::InTable { headers, .. } = &mut self.step else {
            return;
        };
        if headers.len() < EXEC_HEADER_ROWS {
            headers.push(HeaderRow::new(row));
            return;
        }
        let outcome = if first_line(row.cell(0)) == EXEC_FILL_MARKER {
            match Self::fill_row(&headers[1], &row) {
                Ok(Some(fill)) => {
                    if let Some(entry) = self.pending.as_mut() {
                        entry.fills.push(fill);
                    }
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            }
        } else {
            Self::order_row(&headers[0], &row).map(|entry| {
                self.entries.extend(self.pending.replace(entry));
            })
        };
        if let Err(err) = outcome {
            scrape_warn!("execution history table rejected: {err}");
            self.pending = None;
            self.entries.clear();
            self.step = ExecStep::Done(Err(err));
        }
    }

    fn on_table_closed(&mut self) {
        if !matches!(self.step, ExecStep::InTable { .. }) {
            return;
        }
        self.entries.extend(self.pending.take());
        scrape_debug!("execution history parsed, {} orders", self.entries.len());
        self.step = ExecStep::Done(Ok(()));
    }
}

impl Program for ExecutionHistoryProgram {
    type Output = Result<Vec<ExecutionHistoryEntry>, ExtractError>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.cursor.on_start(name);
        let signal = match &mut self.step {
            ExecStep::CountTables(counter) => {
                if name == "table" && counter.on_table() {
                    self.step = ExecStep::InTable {
                        walker: TableWalker::new(),
                        headers: Vec::with_capacity(EXEC_HEADER_ROWS),
                    };
                }
                return;
            }
            ExecStep::InTable { walker, .. } => walker.on_start_tag(name, attrs),
            ExecStep::SeekHeading | ExecStep::Done(_) => return,
        };
        if let TableSignal::RowClosed(row) = signal {
            self.on_row(row);
        }
    }

    fn on_end_tag(&mut self, name: &str) {
        self.cursor.on_end();
        let ExecStep::InTable { walker, .. } = &mut self.step else {
            return;
        };
        match walker.on_end_tag(name) {
            TableSignal::Pending => {}
            TableSignal::RowClosed(row) => self.on_row(row),
            TableSignal::TableClosed(last) => {
                if let Some(row) = last {
                    self.on_row(row);
                }
                self.on_table_closed();
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        if self.pending.is_none() && self.entries.is_empty() && contains_any(text, EXEC_NO_ORDERS)
        {
            scrape_debug!("execution history reports no orders today");
            self.step = ExecStep::Done(Ok(()));
            return;
        }
        match &mut self.step {
            ExecStep::SeekHeading => {
                if self.cursor.take_text_of("div", text) && text.trim() == EXEC_HEADING {
                    self.step = ExecStep::CountTables(TableCounter::new(EXEC_TABLE_ORDINAL));
                }
            }
            ExecStep::InTable { walker, .. } => walker.on_text(text),
            ExecStep::CountTables(_) | ExecStep::Done(_) => {}
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.step, ExecStep::Done(_))
    }

    fn finish(self) -> Self::Output {
        match self.step {
            ExecStep::Done(Ok(())) => Ok(self.entries),
            ExecStep::Done(Err(err)) => Err(err),
            ExecStep::SeekHeading => Err(ExtractError::mismatch(PROGRAM, "heading")),
            ExecStep::CountTables(_) | ExecStep::InTable { .. } => {
                Err(ExtractError::mismatch(PROGRAM, "order table"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_timestamp_gets_a_space() {
        assert_eq!(
            normalize_timestamp("05/1214:32:10").as_deref(),
            Some("05/12 14:32:10")
        );
        assert_eq!(
            normalize_timestamp("05/12\n14:32:10").as_deref(),
            Some("05/12 14:32:10")
        );
        assert_eq!(normalize_timestamp("--"), None);
        assert_eq!(normalize_timestamp("05/12 14:32"), None);
    }

    #[test]
    fn trade_text_gives_kind_and_margin_flag() {
        assert_eq!(trade_kind("信用返済売").ok(), Some((OrderKind::CloseSell, true)));
        assert_eq!(trade_kind("現物買").ok(), Some((OrderKind::Buy, false)));
        assert!(trade_kind("投信").is_err());
    }
}

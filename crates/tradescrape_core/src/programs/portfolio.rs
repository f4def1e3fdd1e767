use tradescrape_logging::{scrape_debug, scrape_warn};

use crate::error::ExtractError;
use crate::event::Attributes;
use crate::phrases::{
    PRODUCT_CODE_MARKER, WATCH_COL_CODE, WATCH_COL_HIGH, WATCH_COL_LAST, WATCH_COL_LOW,
    WATCH_COL_OPEN, WATCH_COL_PREV_CLOSE, WATCH_COL_VOLUME, WATCH_REFRESH_BUTTON,
    WATCH_SELECTOR_NAME,
};
use crate::program::Program;
use crate::record::{NamedCode, PortfolioWatchEntry};
use crate::table::{HeaderRow, Row, TableSignal, TableWalker};
use crate::text::{leading_code, parse_count, parse_price, COUNT_SENTINEL, PRICE_SENTINEL};

/// Security codes are the last four digits of a product link.
fn code_from_href(href: &str) -> u32 {
    let digits: Vec<char> = href
        .trim_end()
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .take(4)
        .collect();
    if digits.len() < 4 {
        return 0;
    }
    digits
        .iter()
        .rev()
        .fold(0, |code, digit| code * 10 + digit.to_digit(10).unwrap_or(0))
}

/// Mobile portfolio: every product link followed by its label.
#[derive(Debug, Clone, Default)]
pub struct PortfolioMobileProgram {
    pending_code: Option<u32>,
    entries: Vec<NamedCode>,
}

impl PortfolioMobileProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Program for PortfolioMobileProgram {
    type Output = Vec<NamedCode>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        if name != "a" {
            return;
        }
        let Some(href) = attrs.get("href") else {
            return;
        };
        if href.contains(PRODUCT_CODE_MARKER) {
            let code = code_from_href(href);
            self.pending_code = (code > 0).then_some(code);
        }
    }

    fn on_end_tag(&mut self, _name: &str) {}

    fn on_text(&mut self, text: &str) {
        let label = text.trim();
        if label.is_empty() {
            return;
        }
        if let Some(code) = self.pending_code.take() {
            self.entries.push(NamedCode {
                label: label.to_string(),
                code,
            });
        }
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn finish(self) -> Vec<NamedCode> {
        scrape_debug!("mobile portfolio listed {} codes", self.entries.len());
        self.entries
    }
}

#[derive(Debug, Clone, Default)]
enum WatchStep {
    #[default]
    SeekSelector,
    SeekRefresh,
    SeekTable,
    InTable {
        walker: TableWalker,
        header: Option<HeaderRow>,
    },
    Done(Result<(), ExtractError>),
}

/// PC watch list: the quote table after the portfolio selector and its
/// refresh button.
#[derive(Debug, Clone, Default)]
pub struct WatchListProgram {
    step: WatchStep,
    entries: Vec<PortfolioWatchEntry>,
}

impl WatchListProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(header: &HeaderRow, row: &Row) -> Result<PortfolioWatchEntry, ExtractError> {
        header.check_shape(row)?;
        let code_text = row.cell(header.require(WATCH_COL_CODE)?);
        let code = leading_code(code_text);
        if code == 0 {
            return Err(ExtractError::InvalidCode {
                text: code_text.to_string(),
            });
        }
        let price = |keys: &[&str]| header.lookup(row, keys).map_or(PRICE_SENTINEL, parse_price);
        Ok(PortfolioWatchEntry {
            code,
            last: price(WATCH_COL_LAST),
            open: price(WATCH_COL_OPEN),
            high: price(WATCH_COL_HIGH),
            low: price(WATCH_COL_LOW),
            prev_close: price(WATCH_COL_PREV_CLOSE),
            volume: header
                .lookup(row, WATCH_COL_VOLUME)
                .map_or(COUNT_SENTINEL, parse_count),
        })
    }

    fn on_row(&mut self, row: Row) {
        if row.is_empty() {
            return;
        }
        let WatchStep::InTable { header, .. } = &mut self.step else {
            return;
        };
        let decoded = match header {
            None => {
                *header = Some(HeaderRow::new(row));
                return;
            }
            Some(header) => Self::decode(header, &row),
        };
        match decoded {
            Ok(entry) => self.entries.push(entry),
            Err(err) => {
                scrape_warn!("watch list table rejected: {err}");
                self.entries.clear();
                self.step = WatchStep::Done(Err(err));
            }
        }
    }
}

impl Program for WatchListProgram {
    type Output = Result<Vec<PortfolioWatchEntry>, ExtractError>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        let signal = match &mut self.step {
            WatchStep::SeekSelector => {
                if name == "select" && attrs.is("name", WATCH_SELECTOR_NAME) {
                    self.step = WatchStep::SeekRefresh;
                }
                return;
            }
            WatchStep::SeekRefresh => {
                if name == "input" && attrs.is("value", WATCH_REFRESH_BUTTON) {
                    self.step = WatchStep::SeekTable;
                }
                return;
            }
            WatchStep::SeekTable => {
                if name == "table" {
                    self.step = WatchStep::InTable {
                        walker: TableWalker::new(),
                        header: None,
                    };
                }
                return;
            }
            WatchStep::InTable { walker, .. } => walker.on_start_tag(name, attrs),
            WatchStep::Done(_) => return,
        };
        if let TableSignal::RowClosed(row) = signal {
            self.on_row(row);
        }
    }

    fn on_end_tag(&mut self, name: &str) {
        let WatchStep::InTable { walker, .. } = &mut self.step else {
            return;
        };
        match walker.on_end_tag(name) {
            TableSignal::Pending => {}
            TableSignal::RowClosed(row) => self.on_row(row),
            TableSignal::TableClosed(last) => {
                if let Some(row) = last {
                    self.on_row(row);
                }
                if matches!(self.step, WatchStep::InTable { .. }) {
                    scrape_debug!("watch list table closed with {} rows", self.entries.len());
                    self.step = WatchStep::Done(Ok(()));
                }
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        if let WatchStep::InTable { walker, .. } = &mut self.step {
            walker.on_text(text);
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.step, WatchStep::Done(_))
    }

    fn finish(self) -> Self::Output {
        match self.step {
            WatchStep::Done(Ok(())) => Ok(self.entries),
            WatchStep::Done(Err(err)) => Err(err),
            WatchStep::SeekSelector => Err(ExtractError::mismatch("watch list", "selector")),
            WatchStep::SeekRefresh => Err(ExtractError::mismatch("watch list", "refresh button")),
            WatchStep::SeekTable | WatchStep::InTable { .. } => {
                Err(ExtractError::mismatch("watch list", "table end"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_code_takes_trailing_four_digits() {
        assert_eq!(code_from_href("/list?ipm_product_code=1301"), 1301);
        assert_eq!(code_from_href("/list?ipm_product_code=71301"), 1301);
        assert_eq!(code_from_href("/list?ipm_product_code=13"), 0);
        assert_eq!(code_from_href("/list?ipm_product_code="), 0);
    }
}

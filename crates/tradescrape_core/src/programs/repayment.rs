use tradescrape_logging::{scrape_debug, scrape_warn};

use crate::error::ExtractError;
use crate::event::Attributes;
use crate::phrases::{
    REPAY_BATCH_SPECIFY, REPAY_CODE_INPUT, REPAY_COL_HELD, REPAY_COL_OPENED_ON,
    REPAY_COL_OPEN_PRICE, REPAY_COL_QUANTITY, REPAY_KEY_INPUT, REPAY_TABLE_ORDINAL,
    REPAY_TITLE_ENTRY, REPAY_TITLE_REPAYMENT,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::{RepaymentLot, RepaymentLotList};
use crate::table::{HeaderRow, Row, TableCounter, TableSignal, TableWalker};
use crate::text::{contains_any, first_line, parse_code, parse_count, parse_price};

const PROGRAM: &str = "repayment lots";

#[derive(Debug, Clone, Default)]
enum RepayStep {
    #[default]
    SeekTitle,
    SeekBatchSpecify,
    CountTables(TableCounter),
    InTable {
        walker: TableWalker,
        header: Option<HeaderRow>,
        /// Name of the quantity `input[type=text]` in the open row.
        row_input: Option<String>,
    },
    Done(Result<(), ExtractError>),
}

/// Mobile margin repayment entry form: the open lots of one security and the
/// form fields that take their repayment quantities.
#[derive(Debug, Clone, Default)]
pub struct RepaymentLotsProgram {
    step: RepayStep,
    cursor: TagCursor,
    code: u32,
    form_key: String,
    lots: Vec<RepaymentLot>,
}

impl RepaymentLotsProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn capture_form_input(&mut self, attrs: &Attributes) {
        let value = attrs.get("value").unwrap_or("");
        if attrs.is("name", REPAY_CODE_INPUT) {
            self.code = parse_code(value);
        } else if attrs.is("name", REPAY_KEY_INPUT) {
            self.form_key = value.to_string();
        }
    }

    fn decode(
        header: &HeaderRow,
        mut row: Row,
        row_input: Option<String>,
    ) -> Result<RepaymentLot, ExtractError> {
        let quantity_field =
            row_input.ok_or_else(|| ExtractError::mismatch(PROGRAM, "quantity input"))?;
        if let Some(column) = header.column(REPAY_COL_QUANTITY) {
            if row.cell(column).is_empty() {
                row.set_cell(column, quantity_field.clone());
            }
        }
        header.check_shape(&row)?;
        let opened_on = first_line(row.cell(header.require(REPAY_COL_OPENED_ON)?)).to_string();
        let open_price = parse_price(row.cell(header.require(REPAY_COL_OPEN_PRICE)?));
        let held = parse_count(row.cell(header.require(REPAY_COL_HELD)?));
        Ok(RepaymentLot {
            opened_on,
            open_price,
            held,
            quantity_field,
        })
    }

    fn on_row(&mut self, row: Row) {
        if row.is_empty() {
            return;
        }
        let RepayStep::InTable {
            header, row_input, ..
        } = &mut self.step
        else {
            return;
        };
        let row_input = row_input.take();
        let decoded = match header {
            None => {
                *header = Some(HeaderRow::new(row));
                return;
            }
            Some(header) => Self::decode(header, row, row_input),
        };
        match decoded {
            Ok(lot) => self.lots.push(lot),
            Err(err) => self.fail(err),
        }
    }

    fn on_table_closed(&mut self) {
        if !matches!(self.step, RepayStep::InTable { .. }) {
            return;
        }
        if self.code == 0 {
            self.fail(ExtractError::InvalidCode {
                text: String::new(),
            });
            return;
        }
        scrape_debug!("repayment list for {}: {} lots", self.code, self.lots.len());
        self.step = RepayStep::Done(Ok(()));
    }

    fn fail(&mut self, err: ExtractError) {
        scrape_warn!("repayment lot table rejected: {err}");
        self.lots.clear();
        self.step = RepayStep::Done(Err(err));
    }
}

impl Program for RepaymentLotsProgram {
    type Output = Result<RepaymentLotList, ExtractError>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.cursor.on_start(name);
        if name == "input" && !matches!(self.step, RepayStep::SeekTitle) {
            self.capture_form_input(attrs);
        }
        let signal = match &mut self.step {
            RepayStep::CountTables(counter) => {
                if name == "table" && counter.on_table() {
                    self.step = RepayStep::InTable {
                        walker: TableWalker::new(),
                        header: None,
                        row_input: None,
                    };
                }
                return;
            }
            RepayStep::InTable {
                walker, row_input, ..
            } => {
                if name == "input" && walker.in_row() && attrs.is("type", "text") {
                    *row_input = attrs.get("name").map(str::to_string);
                }
                walker.on_start_tag(name, attrs)
            }
            RepayStep::SeekTitle | RepayStep::SeekBatchSpecify | RepayStep::Done(_) => return,
        };
        if let TableSignal::RowClosed(row) = signal {
            self.on_row(row);
        }
    }

    fn on_end_tag(&mut self, name: &str) {
        self.cursor.on_end();
        let RepayStep::InTable { walker, .. } = &mut self.step else {
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
        match &mut self.step {
            RepayStep::SeekTitle => {
                if self.cursor.take_text_of("title", text)
                    && contains_any(text, REPAY_TITLE_ENTRY)
                    && contains_any(text, REPAY_TITLE_REPAYMENT)
                {
                    self.step = RepayStep::SeekBatchSpecify;
                }
            }
            RepayStep::SeekBatchSpecify => {
                if contains_any(text, REPAY_BATCH_SPECIFY) {
                    self.step = RepayStep::CountTables(TableCounter::new(REPAY_TABLE_ORDINAL));
                }
            }
            RepayStep::InTable { walker, .. } => walker.on_text(text),
            RepayStep::CountTables(_) | RepayStep::Done(_) => {}
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.step, RepayStep::Done(_))
    }

    fn finish(self) -> Self::Output {
        match self.step {
            RepayStep::Done(Ok(())) => Ok(RepaymentLotList {
                code: self.code,
                form_key: self.form_key,
                lots: self.lots,
            }),
            RepayStep::Done(Err(err)) => Err(err),
            RepayStep::SeekTitle => Err(ExtractError::mismatch(PROGRAM, "title")),
            RepayStep::SeekBatchSpecify => Err(ExtractError::mismatch(PROGRAM, "batch specify")),
            RepayStep::CountTables(_) | RepayStep::InTable { .. } => {
                Err(ExtractError::mismatch(PROGRAM, "lot table"))
            }
        }
    }
}

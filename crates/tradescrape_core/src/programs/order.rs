use tradescrape_logging::{scrape_debug, scrape_warn};

use crate::error::ExtractError;
use crate::event::Attributes;
use crate::phrases::{
    LEVERAGE_MARKERS, ORDER_ACCEPTED, ORDER_FIELD_ACCOUNT, ORDER_FIELD_PRICE,
    ORDER_FIELD_QUANTITY, ORDER_NUMBER_INPUT, ORDER_RESULT_TABLES, ORDER_TITLE_ACCEPTED,
    ORDER_TITLE_CLASS, ORDER_TITLE_KINDS,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::{ExchangeTag, OrderKind, OrderPrice, OrderResult};
use crate::table::{TableSignal, TableWalker};
use crate::text::{contains_any, first_line, parse_code, parse_count, PRICE_SENTINEL};

const PROGRAM: &str = "order result";

#[derive(Debug, Clone, Default)]
enum OrderStep {
    #[default]
    SeekTitle,
    TitleText,
    /// Acceptance wording follows a `br`.
    SeekAcceptance,
    SeekOrderNumber,
    SeekDisplayId,
    SeekTable,
    InTable(TableWalker),
    Done(Result<(), ExtractError>),
}

/// Mobile order acceptance page.
///
/// The title gives the order kind and margin flag, the hidden `orderNum`
/// input the internal id, and two summary tables the code, exchange,
/// quantity and price.
#[derive(Debug, Clone, Default)]
pub struct OrderResultProgram {
    step: OrderStep,
    cursor: TagCursor,
    order_kind: Option<OrderKind>,
    leveraged: bool,
    internal_id: i64,
    display_id: i64,
    tables_seen: usize,
    cells: Vec<String>,
    result: Option<OrderResult>,
}

impl OrderResultProgram {
    pub fn new() -> Self {
        Self {
            internal_id: -1,
            display_id: -1,
            ..Self::default()
        }
    }

    fn kind_of(title: &str) -> Option<OrderKind> {
        ORDER_TITLE_KINDS
            .iter()
            .find(|(markers, _)| markers.iter().all(|marker| title.contains(marker)))
            .map(|(_, kind)| *kind)
    }

    fn on_title(&mut self, text: &str) {
        if !contains_any(text, ORDER_TITLE_ACCEPTED) {
            return;
        }
        self.leveraged = contains_any(text, LEVERAGE_MARKERS);
        self.order_kind = Self::kind_of(text);
        self.step = match self.order_kind {
            Some(_) => OrderStep::SeekAcceptance,
            None => OrderStep::Done(Err(ExtractError::UnknownTradeKind {
                text: text.trim().to_string(),
            })),
        };
    }

    fn enter_table(&mut self) {
        self.tables_seen += 1;
        self.step = OrderStep::InTable(TableWalker::new());
    }

    fn on_table_closed(&mut self) {
        if self.tables_seen < ORDER_RESULT_TABLES {
            self.step = OrderStep::SeekTable;
            return;
        }
        self.step = match self.decode() {
            Ok(result) => {
                scrape_debug!(
                    "order accepted: internal id {}, code {}",
                    result.internal_id,
                    result.code
                );
                self.result = Some(result);
                OrderStep::Done(Ok(()))
            }
            Err(err) => {
                scrape_warn!("order result tables rejected: {err}");
                OrderStep::Done(Err(err))
            }
        };
    }

    /// Cells are: code, exchange, then alternating field name and value.
    fn decode(&self) -> Result<OrderResult, ExtractError> {
        let order_kind = self
            .order_kind
            .ok_or_else(|| ExtractError::mismatch(PROGRAM, "title"))?;
        let code_text = self.cells.first().map(String::as_str).unwrap_or("");
        let code = parse_code(first_line(code_text));
        if code == 0 {
            return Err(ExtractError::InvalidCode {
                text: code_text.to_string(),
            });
        }
        let exchange_tag = self
            .cells
            .get(1)
            .map_or(ExchangeTag::Unknown, |text| ExchangeTag::from_text(text));

        let mut quantity = 0;
        let mut price = OrderPrice::Limit(PRICE_SENTINEL);
        let mut leveraged = self.leveraged;
        for pair in self.cells.get(2..).unwrap_or_default().chunks(2) {
            let [name, value] = pair else {
                break;
            };
            let name = first_line(name);
            if contains_any(name, ORDER_FIELD_QUANTITY) {
                quantity = parse_count(value);
            } else if contains_any(name, ORDER_FIELD_PRICE) {
                price = OrderPrice::from_text(first_line(value));
            } else if contains_any(name, ORDER_FIELD_ACCOUNT)
                && contains_any(value, LEVERAGE_MARKERS)
            {
                leveraged = true;
            }
        }

        Ok(OrderResult {
            accepted: true,
            internal_id: self.internal_id,
            display_id: if order_kind.has_display_id() {
                self.display_id
            } else {
                -1
            },
            exchange_tag,
            code,
            quantity,
            price,
            leveraged,
            order_kind,
        })
    }
}

impl Program for OrderResultProgram {
    type Output = Result<OrderResult, ExtractError>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.cursor.on_start(name);
        match &mut self.step {
            OrderStep::SeekTitle => {
                if name == "div" && attrs.is("class", ORDER_TITLE_CLASS) {
                    self.step = OrderStep::TitleText;
                }
            }
            OrderStep::SeekOrderNumber => {
                if name != "input" || !attrs.is("name", ORDER_NUMBER_INPUT) {
                    return;
                }
                let Some(value) = attrs.get("value") else {
                    return;
                };
                self.internal_id = value.trim().parse().unwrap_or(-1);
                let has_display_id = self.order_kind.is_some_and(OrderKind::has_display_id);
                self.step = if has_display_id {
                    OrderStep::SeekDisplayId
                } else {
                    OrderStep::SeekTable
                };
            }
            OrderStep::SeekDisplayId | OrderStep::SeekTable => {
                if name == "table" {
                    self.enter_table();
                }
            }
            OrderStep::InTable(walker) => {
                if let TableSignal::RowClosed(row) = walker.on_start_tag(name, attrs) {
                    self.cells.extend(row.into_cells());
                }
            }
            OrderStep::TitleText | OrderStep::SeekAcceptance | OrderStep::Done(_) => {}
        }
    }

    fn on_end_tag(&mut self, name: &str) {
        self.cursor.on_end();
        let OrderStep::InTable(walker) = &mut self.step else {
            return;
        };
        match walker.on_end_tag(name) {
            TableSignal::Pending => {}
            TableSignal::RowClosed(row) => self.cells.extend(row.into_cells()),
            TableSignal::TableClosed(last) => {
                if let Some(row) = last {
                    self.cells.extend(row.into_cells());
                }
                self.on_table_closed();
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        match &mut self.step {
            OrderStep::TitleText => {
                if self.cursor.take_text_of("div", text) {
                    self.on_title(text);
                }
            }
            OrderStep::SeekAcceptance => {
                if self.cursor.take_text_of("br", text) && contains_any(text, ORDER_ACCEPTED) {
                    self.step = OrderStep::SeekOrderNumber;
                }
            }
            OrderStep::SeekDisplayId => {
                let digits = text.trim();
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                    self.display_id = digits.parse().unwrap_or(-1);
                    self.step = OrderStep::SeekTable;
                }
            }
            OrderStep::InTable(walker) => walker.on_text(text),
            _ => {}
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.step, OrderStep::Done(_))
    }

    fn finish(self) -> Self::Output {
        match self.step {
            OrderStep::Done(Ok(())) => self
                .result
                .ok_or_else(|| ExtractError::mismatch(PROGRAM, "tables")),
            OrderStep::Done(Err(err)) => Err(err),
            OrderStep::SeekTitle | OrderStep::TitleText => {
                Err(ExtractError::mismatch(PROGRAM, "title"))
            }
            OrderStep::SeekAcceptance => Err(ExtractError::mismatch(PROGRAM, "acceptance")),
            OrderStep::SeekOrderNumber => Err(ExtractError::mismatch(PROGRAM, "order number")),
            OrderStep::SeekDisplayId | OrderStep::SeekTable | OrderStep::InTable(_) => {
                Err(ExtractError::mismatch(PROGRAM, "tables"))
            }
        }
    }
}

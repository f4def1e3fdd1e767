use tradescrape_logging::{scrape_debug, scrape_warn};

use crate::error::ExtractError;
use crate::event::Attributes;
use crate::phrases::{
    OWNED_COL_CODE, OWNED_COL_OPENED_ON, OWNED_COL_OPEN_PRICE, OWNED_COL_QUANTITY,
    OWNED_COL_SIDE, OWNED_HEADING, OWNED_HEADING_CLASS, OWNED_MARGIN_SECTION,
    OWNED_SHORT_MARKERS, OWNED_SPOT_SECTION,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::{OwnedMarginPosition, OwnedPositions, OwnedSpotPosition};
use crate::table::{HeaderRow, Row, TableSignal, TableWalker};
use crate::text::{contains_any, find_code, first_line, parse_count, parse_price};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Spot,
    Margin,
}

#[derive(Debug, Clone, Default)]
enum OwnedStep {
    #[default]
    SeekHeading,
    HeadingText,
    SeekSection,
    SeekTable(Section),
    InTable {
        section: Section,
        walker: TableWalker,
        header: Option<HeaderRow>,
    },
    Done(Result<(), ExtractError>),
}

/// PC portfolio page: spot holdings and margin lots, one table per section.
#[derive(Debug, Clone, Default)]
pub struct OwnedPositionsProgram {
    step: OwnedStep,
    cursor: TagCursor,
    spot_visited: bool,
    margin_visited: bool,
    positions: OwnedPositions,
}

impl OwnedPositionsProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn section_of(text: &str) -> Option<Section> {
        if contains_any(text, OWNED_SPOT_SECTION) {
            Some(Section::Spot)
        } else if contains_any(text, OWNED_MARGIN_SECTION) {
            Some(Section::Margin)
        } else {
            None
        }
    }

    fn row_code(header: &HeaderRow, row: &Row) -> Result<u32, ExtractError> {
        header.check_shape(row)?;
        let text = row.cell(header.require(OWNED_COL_CODE)?);
        match find_code(text) {
            0 => Err(ExtractError::InvalidCode {
                text: text.to_string(),
            }),
            code => Ok(code),
        }
    }

    fn add_spot(
        positions: &mut OwnedPositions,
        header: &HeaderRow,
        row: &Row,
    ) -> Result<(), ExtractError> {
        let code = Self::row_code(header, row)?;
        let quantity = parse_count(row.cell(header.require(OWNED_COL_QUANTITY)?));
        match positions.spot.iter_mut().find(|held| held.code == code) {
            Some(held) => {
                held.quantity = held
                    .quantity
                    .checked_add(quantity)
                    .ok_or(ExtractError::QuantityOverflow { code })?;
            }
            None => positions.spot.push(OwnedSpotPosition { code, quantity }),
        }
        Ok(())
    }

    fn add_margin(
        positions: &mut OwnedPositions,
        header: &HeaderRow,
        row: &Row,
    ) -> Result<(), ExtractError> {
        let code = Self::row_code(header, row)?;
        let quantity = parse_count(row.cell(header.require(OWNED_COL_QUANTITY)?));
        let is_short = header
            .lookup(row, OWNED_COL_SIDE)
            .is_some_and(|side| contains_any(side, OWNED_SHORT_MARKERS));
        let opened_on = header
            .lookup(row, OWNED_COL_OPENED_ON)
            .map(|text| first_line(text).to_string())
            .unwrap_or_default();
        let open_price = header
            .lookup(row, OWNED_COL_OPEN_PRICE)
            .map_or(crate::text::PRICE_SENTINEL, parse_price);
        positions.margin.push(OwnedMarginPosition {
            code,
            quantity,
            is_short,
            opened_on,
            open_price,
        });
        Ok(())
    }

    fn on_row(&mut self, row: Row) {
        if row.is_empty() {
            return;
        }
        let Self {
            step, positions, ..
        } = self;
        let OwnedStep::InTable {
            section, header, ..
        } = step
        else {
            return;
        };
        let header = match header {
            Some(header) => &*header,
            None => {
                *header = Some(HeaderRow::new(row));
                return;
            }
        };
        let added = match section {
            Section::Spot => Self::add_spot(positions, header, &row),
            Section::Margin => Self::add_margin(positions, header, &row),
        };
        if let Err(err) = added {
            scrape_warn!("owned positions table rejected: {err}");
            self.positions = OwnedPositions::default();
            self.step = OwnedStep::Done(Err(err));
        }
    }

    fn on_table_closed(&mut self) {
        let OwnedStep::InTable { section, .. } = self.step else {
            return;
        };
        match section {
            Section::Spot => self.spot_visited = true,
            Section::Margin => self.margin_visited = true,
        }
        self.step = if self.spot_visited && self.margin_visited {
            scrape_debug!(
                "owned positions complete: {} spot, {} margin",
                self.positions.spot.len(),
                self.positions.margin.len()
            );
            OwnedStep::Done(Ok(()))
        } else {
            OwnedStep::SeekSection
        };
    }
}

impl Program for OwnedPositionsProgram {
    type Output = Result<OwnedPositions, ExtractError>;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.cursor.on_start(name);
        let signal = match &mut self.step {
            OwnedStep::SeekHeading => {
                if name == "div" && attrs.is("class", OWNED_HEADING_CLASS) {
                    self.step = OwnedStep::HeadingText;
                }
                return;
            }
            OwnedStep::SeekTable(section) => {
                let section = *section;
                if name == "table" {
                    self.step = OwnedStep::InTable {
                        section,
                        walker: TableWalker::new(),
                        header: None,
                    };
                }
                return;
            }
            OwnedStep::InTable { walker, .. } => walker.on_start_tag(name, attrs),
            OwnedStep::HeadingText | OwnedStep::SeekSection | OwnedStep::Done(_) => return,
        };
        if let TableSignal::RowClosed(row) = signal {
            self.on_row(row);
        }
    }

    fn on_end_tag(&mut self, name: &str) {
        self.cursor.on_end();
        let OwnedStep::InTable { walker, .. } = &mut self.step else {
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
            OwnedStep::HeadingText => {
                if text.trim().is_empty() {
                    return;
                }
                self.step = if text.trim() == OWNED_HEADING {
                    OwnedStep::SeekSection
                } else {
                    OwnedStep::SeekHeading
                };
            }
            OwnedStep::SeekSection | OwnedStep::SeekTable(_) => {
                if !self.cursor.take_text_of("b", text) {
                    return;
                }
                if let Some(section) = Self::section_of(text) {
                    self.step = OwnedStep::SeekTable(section);
                }
            }
            OwnedStep::InTable { walker, .. } => walker.on_text(text),
            OwnedStep::SeekHeading | OwnedStep::Done(_) => {}
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.step, OwnedStep::Done(_))
    }

    fn finish(self) -> Self::Output {
        match self.step {
            OwnedStep::Done(Err(err)) => Err(err),
            OwnedStep::SeekHeading | OwnedStep::HeadingText => {
                Err(ExtractError::mismatch("owned positions", "heading"))
            }
            _ if !(self.spot_visited || self.margin_visited) => {
                Err(ExtractError::mismatch("owned positions", "section table"))
            }
            _ => Ok(self.positions),
        }
    }
}

//! Row/column walking shared by every table-reading program.
//!
//! Only the open row, the open cell and the pending row-span carries are kept;
//! finished rows are handed to the caller immediately.

use crate::error::ExtractError;
use crate::event::Attributes;

/// One finished table row. Cell text pieces are trimmed and joined with `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell text at `index`, or "" past the end.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn set_cell(&mut self, index: usize, text: String) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = text;
        }
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

/// Header row: cell texts become the column-name keys of later rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRow {
    names: Vec<String>,
}

impl HeaderRow {
    pub fn new(row: Row) -> Self {
        Self {
            names: row.into_cells(),
        }
    }

    /// First column whose name contains any of `keys`.
    pub fn column(&self, keys: &[&str]) -> Option<usize> {
        self.names
            .iter()
            .position(|name| keys.iter().any(|key| name.contains(key)))
    }

    pub fn require(&self, keys: &[&'static str]) -> Result<usize, ExtractError> {
        self.column(keys).ok_or(ExtractError::MissingColumn {
            column: keys.first().copied().unwrap_or(""),
        })
    }

    /// A data row must have exactly as many columns as its header.
    pub fn check_shape(&self, row: &Row) -> Result<(), ExtractError> {
        if row.len() == self.names.len() {
            Ok(())
        } else {
            Err(ExtractError::ShapeMismatch {
                expected: self.names.len(),
                found: row.len(),
            })
        }
    }

    /// Look a cell up by column name rather than position.
    pub fn lookup<'r>(&self, row: &'r Row, keys: &[&str]) -> Option<&'r str> {
        self.column(keys).map(|index| row.cell(index))
    }
}

/// Counts `table` start tags until a fixed ordinal is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounter {
    seen: usize,
    target: usize,
}

impl TableCounter {
    /// `target` is 1-based: 1 means the first table seen.
    pub fn new(target: usize) -> Self {
        Self { seen: 0, target }
    }

    /// Register a `table` start tag; true exactly when it is the target.
    pub fn on_table(&mut self) -> bool {
        self.seen += 1;
        self.seen == self.target
    }
}

/// What a table event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSignal {
    Pending,
    RowClosed(Row),
    /// The walked table ended; carries a row left open by missing `</tr>`.
    TableClosed(Option<Row>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenCell {
    text: String,
    rowspan: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Carry {
    text: String,
    remaining: usize,
}

/// Walks one table's rows and cells, repeating row-spanned cells into the
/// rows they cover. Tables nested inside a cell contribute text to that cell
/// and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableWalker {
    nested: usize,
    row: Option<Vec<String>>,
    cell: Option<OpenCell>,
    carry: Vec<Option<Carry>>,
}

impl TableWalker {
    /// Create a walker right after the table's own start tag.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_row(&self) -> bool {
        self.row.is_some() && self.nested == 0
    }

    pub fn on_start_tag(&mut self, name: &str, attrs: &Attributes) -> TableSignal {
        if name == "table" {
            self.nested += 1;
            return TableSignal::Pending;
        }
        if self.nested > 0 {
            return TableSignal::Pending;
        }
        match name {
            "tr" => {
                let unclosed = self.close_row();
                self.row = Some(Vec::new());
                unclosed.map_or(TableSignal::Pending, TableSignal::RowClosed)
            }
            "td" | "th" => {
                self.close_cell();
                if self.row.is_none() {
                    self.row = Some(Vec::new());
                }
                self.fill_carried();
                let rowspan = attrs
                    .get("rowspan")
                    .and_then(|span| span.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                self.cell = Some(OpenCell {
                    text: String::new(),
                    rowspan,
                });
                TableSignal::Pending
            }
            _ => TableSignal::Pending,
        }
    }

    pub fn on_end_tag(&mut self, name: &str) -> TableSignal {
        if name == "table" {
            if self.nested > 0 {
                self.nested -= 1;
                return TableSignal::Pending;
            }
            return TableSignal::TableClosed(self.close_row());
        }
        if self.nested > 0 {
            return TableSignal::Pending;
        }
        match name {
            "tr" => self
                .close_row()
                .map_or(TableSignal::Pending, TableSignal::RowClosed),
            "td" | "th" => {
                self.close_cell();
                TableSignal::Pending
            }
            _ => TableSignal::Pending,
        }
    }

    pub fn on_text(&mut self, text: &str) {
        let piece = text.trim();
        if piece.is_empty() {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            if !cell.text.is_empty() {
                cell.text.push('\n');
            }
            cell.text.push_str(piece);
        }
    }

    fn close_cell(&mut self) {
        let Some(cell) = self.cell.take() else {
            return;
        };
        let Some(row) = self.row.as_mut() else {
            return;
        };
        let column = row.len();
        if cell.rowspan >= 2 {
            if self.carry.len() <= column {
                self.carry.resize(column + 1, None);
            }
            self.carry[column] = Some(Carry {
                text: cell.text.clone(),
                remaining: cell.rowspan - 1,
            });
        }
        row.push(cell.text);
    }

    fn close_row(&mut self) -> Option<Row> {
        self.close_cell();
        self.row.as_ref()?;
        self.fill_carried();
        self.row.take().map(Row::new)
    }

    /// Re-insert cells spanned down from earlier rows at the current column.
    fn fill_carried(&mut self) {
        let Some(row) = self.row.as_mut() else {
            return;
        };
        while let Some(slot) = self.carry.get_mut(row.len()) {
            let Some(carry) = slot.as_mut() else {
                break;
            };
            row.push(carry.text.clone());
            carry.remaining -= 1;
            if carry.remaining == 0 {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(walker: &mut TableWalker, rows: &[&[(&str, usize)]]) -> Vec<Row> {
        let mut out = Vec::new();
        for cells in rows {
            walker.on_start_tag("tr", &Attributes::new());
            for (text, span) in cells.iter() {
                let attrs = if *span > 1 {
                    Attributes::from_pairs([("rowspan", span.to_string())])
                } else {
                    Attributes::new()
                };
                walker.on_start_tag("td", &attrs);
                walker.on_text(text);
                walker.on_end_tag("td");
            }
            if let TableSignal::RowClosed(row) = walker.on_end_tag("tr") {
                out.push(row);
            }
        }
        out
    }

    #[test]
    fn rowspan_repeats_cell_into_following_rows() {
        let mut walker = TableWalker::new();
        let rows = walk(
            &mut walker,
            &[&[("1301", 3), ("a", 1)], &[("b", 1)], &[("c", 1)], &[("x", 1), ("y", 1)]],
        );
        let cells: Vec<Vec<String>> = rows.into_iter().map(Row::into_cells).collect();
        assert_eq!(
            cells,
            vec![
                vec!["1301".to_string(), "a".to_string()],
                vec!["1301".to_string(), "b".to_string()],
                vec!["1301".to_string(), "c".to_string()],
                vec!["x".to_string(), "y".to_string()],
            ]
        );
    }

    #[test]
    fn trailing_rowspan_is_filled_at_row_end() {
        let mut walker = TableWalker::new();
        let rows = walk(&mut walker, &[&[("a", 1), ("z", 2)], &[("b", 1)]]);
        assert_eq!(rows[1].cells(), &["b".to_string(), "z".to_string()]);
    }

    #[test]
    fn nested_table_text_stays_in_outer_cell() {
        let mut walker = TableWalker::new();
        walker.on_start_tag("tr", &Attributes::new());
        walker.on_start_tag("td", &Attributes::new());
        walker.on_start_tag("table", &Attributes::new());
        walker.on_start_tag("tr", &Attributes::new());
        walker.on_start_tag("td", &Attributes::new());
        walker.on_text("inner");
        walker.on_end_tag("td");
        walker.on_end_tag("tr");
        assert_eq!(walker.on_end_tag("table"), TableSignal::Pending);
        walker.on_end_tag("td");
        let signal = walker.on_end_tag("tr");
        assert_eq!(signal, TableSignal::RowClosed(Row::new(vec!["inner".into()])));
        assert_eq!(walker.on_end_tag("table"), TableSignal::TableClosed(None));
    }

    #[test]
    fn header_lookup_is_by_name() {
        let header = HeaderRow::new(Row::new(vec!["出来高".into(), "銘柄".into()]));
        let row = Row::new(vec!["1,000".into(), "1301".into()]);
        assert_eq!(header.lookup(&row, &["銘柄"]), Some("1301"));
        assert!(header.check_shape(&Row::new(vec!["1".into()])).is_err());
    }

    #[test]
    fn counter_hits_target_once() {
        let mut counter = TableCounter::new(2);
        assert!(!counter.on_table());
        assert!(counter.on_table());
        assert!(!counter.on_table());
    }
}

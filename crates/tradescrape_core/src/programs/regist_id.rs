use tradescrape_logging::scrape_debug;

use crate::event::Attributes;
use crate::phrases::{
    ORDER_CONFIRM_TITLE, ORDER_ENTRY_TITLE, REGIST_ID_INPUT, TITLE_AMEND, TITLE_BUY,
    TITLE_CANCEL, TITLE_CLOSE_BUY, TITLE_CLOSE_SELL, TITLE_SELL,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::{OrderKind, OrderStage, RegistId};
use crate::text::contains_any;

/// Title phrases that must both appear before the id is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TitleGate {
    stage: &'static [&'static str],
    kind: &'static [&'static str],
}

/// Reads the `regist_id` hidden input of a form page.
///
/// The portfolio registration form is trusted as-is; order forms are only
/// trusted once their `<title>` names the expected stage and order kind.
#[derive(Debug, Clone)]
pub struct RegistIdProgram {
    gate: Option<TitleGate>,
    gate_open: bool,
    cursor: TagCursor,
    value: i64,
}

impl RegistIdProgram {
    pub fn portfolio() -> Self {
        Self {
            gate: None,
            gate_open: true,
            cursor: TagCursor::default(),
            value: RegistId::NOT_FOUND,
        }
    }

    pub fn order(stage: OrderStage, kind: OrderKind) -> Self {
        let stage = match stage {
            OrderStage::Entry => ORDER_ENTRY_TITLE,
            OrderStage::Confirm => ORDER_CONFIRM_TITLE,
        };
        let kind = match kind {
            OrderKind::Buy => TITLE_BUY,
            OrderKind::Sell => TITLE_SELL,
            OrderKind::Amend => TITLE_AMEND,
            OrderKind::Cancel => TITLE_CANCEL,
            OrderKind::CloseSell => TITLE_CLOSE_SELL,
            OrderKind::CloseBuy => TITLE_CLOSE_BUY,
        };
        Self {
            gate: Some(TitleGate { stage, kind }),
            gate_open: false,
            cursor: TagCursor::default(),
            value: RegistId::NOT_FOUND,
        }
    }
}

impl Program for RegistIdProgram {
    type Output = RegistId;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.cursor.on_start(name);
        if !self.gate_open || name != "input" || !attrs.is("name", REGIST_ID_INPUT) {
            return;
        }
        if let Some(value) = attrs.get("value") {
            self.value = value.trim().parse().unwrap_or(RegistId::NOT_FOUND);
            if self.value != RegistId::NOT_FOUND {
                scrape_debug!("regist_id captured: {}", self.value);
            }
        }
    }

    fn on_end_tag(&mut self, _name: &str) {
        self.cursor.on_end();
    }

    fn on_text(&mut self, text: &str) {
        if !self.cursor.take_text_of("title", text) || self.gate_open {
            return;
        }
        if let Some(gate) = self.gate {
            self.gate_open = contains_any(text, gate.stage) && contains_any(text, gate.kind);
        }
    }

    fn is_terminal(&self) -> bool {
        self.value != RegistId::NOT_FOUND
    }

    fn finish(self) -> RegistId {
        RegistId { value: self.value }
    }
}

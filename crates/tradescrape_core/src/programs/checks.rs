use tradescrape_logging::scrape_debug;

use crate::event::Attributes;
use crate::phrases::{MARGIN_TITLE, TRANSMISSION_ACCEPTED, TRANSMISSION_ENTRANCE_ALT};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::PageCheck;
use crate::text::contains_any;

/// Margin-availability page: recognised by its `<title>`.
#[derive(Debug, Clone, Default)]
pub struct MarginCheckProgram {
    cursor: TagCursor,
    matched: bool,
}

impl MarginCheckProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Program for MarginCheckProgram {
    type Output = PageCheck;

    fn on_start_tag(&mut self, name: &str, _attrs: &Attributes) {
        self.cursor.on_start(name);
    }

    fn on_end_tag(&mut self, _name: &str) {
        self.cursor.on_end();
    }

    fn on_text(&mut self, text: &str) {
        if self.cursor.take_text_of("title", text) && contains_any(text, MARGIN_TITLE) {
            scrape_debug!("margin availability page recognised");
            self.matched = true;
        }
    }

    fn is_terminal(&self) -> bool {
        self.matched
    }

    fn finish(self) -> PageCheck {
        PageCheck::from_match(self.matched)
    }
}

/// Portfolio transmission entrance: the page shows the list-replacement
/// feature image.
#[derive(Debug, Clone, Default)]
pub struct TransmissionEntranceProgram {
    matched: bool,
}

impl TransmissionEntranceProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Program for TransmissionEntranceProgram {
    type Output = PageCheck;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        if name != "img" {
            return;
        }
        if attrs
            .get("alt")
            .is_some_and(|alt| contains_any(alt, TRANSMISSION_ENTRANCE_ALT))
        {
            self.matched = true;
        }
    }

    fn on_end_tag(&mut self, _name: &str) {}

    fn on_text(&mut self, _text: &str) {}

    fn is_terminal(&self) -> bool {
        self.matched
    }

    fn finish(self) -> PageCheck {
        PageCheck::from_match(self.matched)
    }
}

/// Portfolio transmission request: a paragraph acknowledges the reservation.
#[derive(Debug, Clone, Default)]
pub struct TransmissionRequestProgram {
    cursor: TagCursor,
    matched: bool,
}

impl TransmissionRequestProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Program for TransmissionRequestProgram {
    type Output = PageCheck;

    fn on_start_tag(&mut self, name: &str, _attrs: &Attributes) {
        self.cursor.on_start(name);
    }

    fn on_end_tag(&mut self, _name: &str) {
        self.cursor.on_end();
    }

    fn on_text(&mut self, text: &str) {
        if self.cursor.take_text_of("p", text) && contains_any(text, TRANSMISSION_ACCEPTED) {
            scrape_debug!("portfolio transmission accepted");
            self.matched = true;
        }
    }

    fn is_terminal(&self) -> bool {
        self.matched
    }

    fn finish(self) -> PageCheck {
        PageCheck::from_match(self.matched)
    }
}

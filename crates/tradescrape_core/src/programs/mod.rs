//! Extraction program catalog, one state machine per page type.
mod checks;
mod execution;
mod login;
mod order;
mod owned;
mod portfolio;
mod regist_id;
mod repayment;

pub use checks::{MarginCheckProgram, TransmissionEntranceProgram, TransmissionRequestProgram};
pub use execution::ExecutionHistoryProgram;
pub use login::{LoginMobileProgram, LoginPcProgram};
pub use order::OrderResultProgram;
pub use owned::OwnedPositionsProgram;
pub use portfolio::{PortfolioMobileProgram, WatchListProgram};
pub use regist_id::RegistIdProgram;
pub use repayment::RepaymentLotsProgram;

/// Tracks the most recent start tag so that text "directly inside" it can be
/// recognised. Whitespace-only text does not count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagCursor {
    current: Option<String>,
    fresh: bool,
}

impl TagCursor {
    pub(crate) fn on_start(&mut self, name: &str) {
        self.current = Some(name.to_string());
        self.fresh = true;
    }

    pub(crate) fn on_end(&mut self) {
        self.current = None;
        self.fresh = false;
    }

    /// Returns true when `text` is the first non-blank text after a `name` start tag.
    pub(crate) fn take_text_of(&mut self, name: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let hit = self.fresh && self.current.as_deref() == Some(name);
        self.fresh = false;
        hit
    }

    /// Current tag, whether or not text has been seen since.
    pub(crate) fn is_inside(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }
}

//! Tradescrape core: tag-event extraction state machines for brokerage pages.
//!
//! Nothing in this crate performs I/O. Callers decode a page, turn it into a
//! stream of [`Event`]s and push them, in document order, into one program.
mod error;
mod event;
pub mod phrases;
mod program;
mod programs;
mod record;
mod table;
pub mod text;

pub use error::ExtractError;
pub use event::{Attributes, Event};
pub use program::{update, PageKind, PageProgram, PageResult, Program};
pub use programs::{
    ExecutionHistoryProgram, LoginMobileProgram, LoginPcProgram, MarginCheckProgram,
    OrderResultProgram, OwnedPositionsProgram, PortfolioMobileProgram, RegistIdProgram,
    RepaymentLotsProgram, TransmissionEntranceProgram, TransmissionRequestProgram,
    WatchListProgram,
};
pub use record::{
    ExchangeTag, ExecutionHistoryEntry, Fill, LoginStatus, NamedCode, OrderKind, OrderPrice,
    OrderResult, OrderStage, OwnedMarginPosition, OwnedPositions, OwnedSpotPosition, PageCheck,
    PortfolioWatchEntry, RegistId, RepaymentLot, RepaymentLotList,
};
pub use table::{HeaderRow, Row, TableCounter, TableSignal, TableWalker};

use crate::error::ExtractError;
use crate::event::{Attributes, Event};
use crate::programs::{
    ExecutionHistoryProgram, LoginMobileProgram, LoginPcProgram, MarginCheckProgram,
    OrderResultProgram, OwnedPositionsProgram, PortfolioMobileProgram, RegistIdProgram,
    RepaymentLotsProgram, TransmissionEntranceProgram, TransmissionRequestProgram,
    WatchListProgram,
};
use crate::record::{
    ExecutionHistoryEntry, LoginStatus, NamedCode, OrderKind, OrderResult, OrderStage,
    OwnedPositions, PageCheck, PortfolioWatchEntry, RegistId, RepaymentLotList,
};
use crate::text::collapse_entity_gaps;

/// Step contract shared by every extraction program.
///
/// Events arrive in document order. Once [`Program::is_terminal`] is true the
/// remaining events are dropped by [`Program::feed`].
pub trait Program {
    type Output;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes);
    fn on_end_tag(&mut self, name: &str);
    fn on_text(&mut self, text: &str);
    fn is_terminal(&self) -> bool;

    /// Consume the program at end of input and build its result.
    fn finish(self) -> Self::Output;

    fn feed(&mut self, event: &Event) {
        if self.is_terminal() {
            return;
        }
        match event {
            Event::StartTag { name, attrs } => self.on_start_tag(name, attrs),
            Event::EndTag { name } => self.on_end_tag(name),
            Event::Text(text) => self.on_text(&collapse_entity_gaps(text)),
        }
    }
}

/// Page types with an extraction program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    LoginMobile,
    LoginPc,
    PortfolioRegistId,
    OrderRegistId { stage: OrderStage, kind: OrderKind },
    PortfolioMobile,
    WatchList,
    OwnedPositions,
    MarginCheck,
    TransmissionEntrance,
    TransmissionRequest,
    OrderResult,
    ExecutionHistory,
    RepaymentLots,
}

/// One live program of any page type.
#[derive(Debug, Clone)]
pub enum PageProgram {
    LoginMobile(LoginMobileProgram),
    LoginPc(LoginPcProgram),
    RegistId(RegistIdProgram),
    PortfolioMobile(PortfolioMobileProgram),
    WatchList(WatchListProgram),
    OwnedPositions(OwnedPositionsProgram),
    MarginCheck(MarginCheckProgram),
    TransmissionEntrance(TransmissionEntranceProgram),
    TransmissionRequest(TransmissionRequestProgram),
    OrderResult(OrderResultProgram),
    ExecutionHistory(ExecutionHistoryProgram),
    RepaymentLots(RepaymentLotsProgram),
}

/// Terminal result of a [`PageProgram`].
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    Login(LoginStatus),
    RegistId(RegistId),
    NamedCodes(Vec<NamedCode>),
    WatchList(Result<Vec<PortfolioWatchEntry>, ExtractError>),
    OwnedPositions(Result<OwnedPositions, ExtractError>),
    Check(PageCheck),
    OrderResult(Result<OrderResult, ExtractError>),
    ExecutionHistory(Result<Vec<ExecutionHistoryEntry>, ExtractError>),
    RepaymentLots(Result<RepaymentLotList, ExtractError>),
}

impl PageResult {
    /// False when the markup did not match the expected shape.
    pub fn parsed_ok(&self) -> bool {
        match self {
            PageResult::Login(status) => status.success,
            PageResult::RegistId(id) => id.is_found(),
            PageResult::NamedCodes(_) => true,
            PageResult::WatchList(result) => result.is_ok(),
            PageResult::OwnedPositions(result) => result.is_ok(),
            PageResult::Check(check) => check.parsed_ok,
            PageResult::OrderResult(result) => result.is_ok(),
            PageResult::ExecutionHistory(result) => result.is_ok(),
            PageResult::RepaymentLots(result) => result.is_ok(),
        }
    }
}

macro_rules! dispatch {
    ($program:expr, $inner:ident => $body:expr) => {
        match $program {
            PageProgram::LoginMobile($inner) => $body,
            PageProgram::LoginPc($inner) => $body,
            PageProgram::RegistId($inner) => $body,
            PageProgram::PortfolioMobile($inner) => $body,
            PageProgram::WatchList($inner) => $body,
            PageProgram::OwnedPositions($inner) => $body,
            PageProgram::MarginCheck($inner) => $body,
            PageProgram::TransmissionEntrance($inner) => $body,
            PageProgram::TransmissionRequest($inner) => $body,
            PageProgram::OrderResult($inner) => $body,
            PageProgram::ExecutionHistory($inner) => $body,
            PageProgram::RepaymentLots($inner) => $body,
        }
    };
}

impl PageProgram {
    pub fn new(kind: PageKind) -> Self {
        match kind {
            PageKind::LoginMobile => PageProgram::LoginMobile(LoginMobileProgram::new()),
            PageKind::LoginPc => PageProgram::LoginPc(LoginPcProgram::new()),
            PageKind::PortfolioRegistId => PageProgram::RegistId(RegistIdProgram::portfolio()),
            PageKind::OrderRegistId { stage, kind } => {
                PageProgram::RegistId(RegistIdProgram::order(stage, kind))
            }
            PageKind::PortfolioMobile => {
                PageProgram::PortfolioMobile(PortfolioMobileProgram::new())
            }
            PageKind::WatchList => PageProgram::WatchList(WatchListProgram::new()),
            PageKind::OwnedPositions => PageProgram::OwnedPositions(OwnedPositionsProgram::new()),
            PageKind::MarginCheck => PageProgram::MarginCheck(MarginCheckProgram::new()),
            PageKind::TransmissionEntrance => {
                PageProgram::TransmissionEntrance(TransmissionEntranceProgram::new())
            }
            PageKind::TransmissionRequest => {
                PageProgram::TransmissionRequest(TransmissionRequestProgram::new())
            }
            PageKind::OrderResult => PageProgram::OrderResult(OrderResultProgram::new()),
            PageKind::ExecutionHistory => {
                PageProgram::ExecutionHistory(ExecutionHistoryProgram::new())
            }
            PageKind::RepaymentLots => PageProgram::RepaymentLots(RepaymentLotsProgram::new()),
        }
    }

    pub fn feed(&mut self, event: &Event) {
        dispatch!(self, program => program.feed(event))
    }

    pub fn is_terminal(&self) -> bool {
        dispatch!(self, program => program.is_terminal())
    }

    pub fn finish(self) -> PageResult {
        match self {
            PageProgram::LoginMobile(program) => PageResult::Login(program.finish()),
            PageProgram::LoginPc(program) => PageResult::Login(program.finish()),
            PageProgram::RegistId(program) => PageResult::RegistId(program.finish()),
            PageProgram::PortfolioMobile(program) => PageResult::NamedCodes(program.finish()),
            PageProgram::WatchList(program) => PageResult::WatchList(program.finish()),
            PageProgram::OwnedPositions(program) => PageResult::OwnedPositions(program.finish()),
            PageProgram::MarginCheck(program) => PageResult::Check(program.finish()),
            PageProgram::TransmissionEntrance(program) => PageResult::Check(program.finish()),
            PageProgram::TransmissionRequest(program) => PageResult::Check(program.finish()),
            PageProgram::OrderResult(program) => PageResult::OrderResult(program.finish()),
            PageProgram::ExecutionHistory(program) => {
                PageResult::ExecutionHistory(program.finish())
            }
            PageProgram::RepaymentLots(program) => PageResult::RepaymentLots(program.finish()),
        }
    }
}

/// Pure step function: applies one event to a program and returns it.
pub fn update(mut program: PageProgram, event: &Event) -> PageProgram {
    program.feed(event);
    program
}

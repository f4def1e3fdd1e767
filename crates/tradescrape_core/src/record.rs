use std::fmt;

use serde::Serialize;

use crate::text::{contains_any, PRICE_SENTINEL};

/// Result of a login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoginStatus {
    /// The page matched one of the known shapes.
    pub success: bool,
    pub logged_in: bool,
    pub notice_present: bool,
}

/// Registration id found in a form page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistId {
    pub value: i64,
}

impl RegistId {
    pub const NOT_FOUND: i64 = -1;

    pub fn not_found() -> Self {
        Self {
            value: Self::NOT_FOUND,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value != Self::NOT_FOUND
    }
}

impl Default for RegistId {
    fn default() -> Self {
        Self::not_found()
    }
}

/// Boolean page check: `value` only carries meaning when `parsed_ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageCheck {
    pub parsed_ok: bool,
    pub value: bool,
}

impl PageCheck {
    pub fn matched() -> Self {
        Self {
            parsed_ok: true,
            value: true,
        }
    }

    /// Checks that only recognise a page report `(true, true)` or `(false, false)`.
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Self::matched()
        } else {
            Self::default()
        }
    }
}

/// Label and security code pair from the mobile portfolio list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCode {
    pub label: String,
    pub code: u32,
}

/// One row of the watch-list table. Prices use `-1.0` when unquoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioWatchEntry {
    pub code: u32,
    pub last: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedSpotPosition {
    pub code: u32,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedMarginPosition {
    pub code: u32,
    pub quantity: i64,
    pub is_short: bool,
    pub opened_on: String,
    pub open_price: f64,
}

/// Spot holdings (merged by code) and margin lots (kept individually).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OwnedPositions {
    pub spot: Vec<OwnedSpotPosition>,
    pub margin: Vec<OwnedMarginPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderKind {
    Buy,
    Sell,
    Amend,
    Cancel,
    CloseSell,
    CloseBuy,
}

impl OrderKind {
    /// Amend and cancel results carry no user-facing order number.
    pub fn has_display_id(self) -> bool {
        !matches!(self, OrderKind::Amend | OrderKind::Cancel)
    }
}

/// Which form page of an order flow a registration id is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderStage {
    Entry,
    Confirm,
}

/// Exchange tag used by order forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ExchangeTag {
    Tokyo,
    Nagoya,
    Fukuoka,
    Sapporo,
    Pts,
    #[default]
    Unknown,
}

impl ExchangeTag {
    const NAMES: &'static [(&'static str, ExchangeTag)] = &[
        ("東証", ExchangeTag::Tokyo),
        ("名証", ExchangeTag::Nagoya),
        ("福証", ExchangeTag::Fukuoka),
        ("札証", ExchangeTag::Sapporo),
        ("PTS", ExchangeTag::Pts),
    ];

    /// Find the first known exchange name inside free text.
    pub fn from_text(text: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(name, _)| text.contains(name))
            .map(|(_, tag)| *tag)
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeTag::Tokyo => "TKY",
            ExchangeTag::Nagoya => "NGY",
            ExchangeTag::Fukuoka => "FKO",
            ExchangeTag::Sapporo => "SPR",
            ExchangeTag::Pts => "JNX",
            ExchangeTag::Unknown => "",
        }
    }
}

impl fmt::Display for ExchangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OrderPrice {
    Limit(f64),
    Market,
}

impl OrderPrice {
    pub fn from_text(text: &str) -> Self {
        if contains_any(text, crate::phrases::MARKET_ORDER) {
            return OrderPrice::Market;
        }
        // "condition/price": the price is the last slash-separated part.
        let price = text.rsplit(['/', '／']).next().unwrap_or(text);
        OrderPrice::Limit(crate::text::parse_price(price))
    }

    /// Numeric view; market orders read as `-1.0`.
    pub fn value(self) -> f64 {
        match self {
            OrderPrice::Limit(value) => value,
            OrderPrice::Market => PRICE_SENTINEL,
        }
    }
}

/// Order acceptance page result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResult {
    pub accepted: bool,
    pub internal_id: i64,
    /// User-facing order number; `-1` for amend and cancel results.
    pub display_id: i64,
    pub exchange_tag: ExchangeTag,
    pub code: u32,
    pub quantity: i64,
    pub price: OrderPrice,
    pub leveraged: bool,
    pub order_kind: OrderKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    /// `MM/DD HH:MM:SS`
    pub timestamp: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionHistoryEntry {
    pub display_id: i64,
    pub order_kind: OrderKind,
    pub exchange_tag: ExchangeTag,
    pub code: u32,
    pub leveraged: bool,
    pub complete: bool,
    pub fills: Vec<Fill>,
}

/// One open margin lot offered for repayment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepaymentLot {
    pub opened_on: String,
    pub open_price: f64,
    pub held: i64,
    /// Name of the form field that takes the repayment quantity for this lot.
    pub quantity_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepaymentLotList {
    pub code: u32,
    pub form_key: String,
    pub lots: Vec<RepaymentLot>,
}

//! Policy data: accepted phrasings, attribute keys and fixed table positions.
//!
//! Every waypoint that matches page text reads its phrase set from here, so a
//! new phrasing variant is a data change. Near-duplicate variants are kept
//! verbatim; each was observed on a real page.

use crate::record::OrderKind;

// login (mobile site)
pub const LOGIN_FAILURE: &[&str] = &["パスワードが違います"];
pub const LOGIN_SUCCESS: &[&str] = &["ログアウト"];

// login (PC site)
pub const LOGOUT_ICON: &str = "ログアウト";
pub const LOGIN_ICON: &str = "ログイン";
pub const NOTICE_CLASS: &str = "title-text";
pub const NOTICE_HEADING: &[&str] = &["重要なお知らせ"];

// registration id
pub const REGIST_ID_INPUT: &str = "regist_id";
pub const ORDER_ENTRY_TITLE: &[&str] = &["注文入力", "訂正入力", "取消入力"];
pub const ORDER_CONFIRM_TITLE: &[&str] = &["注文確認", "訂正確認", "取消確認"];
// Bracket width differs between page releases.
pub const TITLE_BUY: &[&str] = &["買)", "買）"];
pub const TITLE_SELL: &[&str] = &["売)", "売）"];
pub const TITLE_AMEND: &[&str] = &["訂正"];
pub const TITLE_CANCEL: &[&str] = &["取消"];
pub const TITLE_CLOSE_SELL: &[&str] = &["返済売"];
pub const TITLE_CLOSE_BUY: &[&str] = &["返済買"];

// portfolio (mobile name/code list)
pub const PRODUCT_CODE_MARKER: &str = "ipm_product_code";

// portfolio (PC watch list)
pub const WATCH_SELECTOR_NAME: &str = "portforio_id";
pub const WATCH_REFRESH_BUTTON: &str = "情報更新";
pub const WATCH_COL_CODE: &[&str] = &["銘柄"];
pub const WATCH_COL_LAST: &[&str] = &["現在値"];
pub const WATCH_COL_OPEN: &[&str] = &["始値"];
pub const WATCH_COL_HIGH: &[&str] = &["高値"];
pub const WATCH_COL_LOW: &[&str] = &["安値"];
pub const WATCH_COL_PREV_CLOSE: &[&str] = &["前日終値"];
pub const WATCH_COL_VOLUME: &[&str] = &["出来高"];

// owned positions (PC)
pub const OWNED_HEADING_CLASS: &str = "title-text";
pub const OWNED_HEADING: &str = "ポートフォリオ";
pub const OWNED_SPOT_SECTION: &[&str] = &["現物/一般預り", "現物／一般預り", "現物（一般預り）"];
pub const OWNED_MARGIN_SECTION: &[&str] = &["信用建玉", "信用取引"];
pub const OWNED_COL_CODE: &[&str] = &["銘柄", "コード"];
pub const OWNED_COL_QUANTITY: &[&str] = &["保有株数", "数量", "建株数"];
pub const OWNED_COL_SIDE: &[&str] = &["売買", "建区分"];
pub const OWNED_COL_OPENED_ON: &[&str] = &["建日"];
pub const OWNED_COL_OPEN_PRICE: &[&str] = &["建単価"];
pub const OWNED_SHORT_MARKERS: &[&str] = &["売建"];

// margin availability (mobile)
pub const MARGIN_TITLE: &[&str] = &["信用建余力", "買付余力"];

// portfolio transmission (PC)
pub const TRANSMISSION_ENTRANCE_ALT: &[&str] = &["登録銘柄リストの追加・置き換え機能"];
pub const TRANSMISSION_ACCEPTED: &[&str] = &["送信指示予約を受付ました"];

// order result (mobile)
pub const ORDER_TITLE_CLASS: &str = "titletext";
pub const ORDER_TITLE_ACCEPTED: &[&str] = &["注文受付", "訂正受付", "取消受付"];
pub const ORDER_ACCEPTED: &[&str] = &[
    "ご注文を受付いたしました",
    "ご注文を受付致しました",
    "ご注文の訂正を受付いたしました",
    "ご注文の取消を受付いたしました",
];
/// Checked in order; every marker of an entry must appear in the title.
pub const ORDER_TITLE_KINDS: &[(&[&str], OrderKind)] = &[
    (&["取消"], OrderKind::Cancel),
    (&["訂正"], OrderKind::Amend),
    (&["返済", "売"], OrderKind::CloseSell),
    (&["返済", "買"], OrderKind::CloseBuy),
    (&["買"], OrderKind::Buy),
    (&["売"], OrderKind::Sell),
];
pub const ORDER_NUMBER_INPUT: &str = "orderNum";
pub const ORDER_RESULT_TABLES: usize = 2;
pub const ORDER_FIELD_QUANTITY: &[&str] = &["株数", "数量"];
pub const ORDER_FIELD_PRICE: &[&str] = &["価格", "単価"];
pub const ORDER_FIELD_ACCOUNT: &[&str] = &["預り区分", "取引"];
pub const MARKET_ORDER: &[&str] = &["成行"];
pub const LEVERAGE_MARKERS: &[&str] = &["信用"];

// today's execution history (PC)
pub const EXEC_HEADING: &str = "注文一覧";
pub const EXEC_NO_ORDERS: &[&str] = &["お客様の株式注文はございません"];
/// The order table is the n-th `table` opened after the heading.
pub const EXEC_TABLE_ORDINAL: usize = 2;
pub const EXEC_HEADER_ROWS: usize = 2;
pub const EXEC_FILL_MARKER: &str = "約定";
pub const EXEC_COL_ORDER_ID: &[&str] = &["注文番号"];
pub const EXEC_COL_BRAND: &[&str] = &["銘柄"];
pub const EXEC_COL_TRADE: &[&str] = &["取引"];
pub const EXEC_COL_STATUS: &[&str] = &["状況"];
pub const EXEC_COL_FILL_TIME: &[&str] = &["約定日時"];
pub const EXEC_COL_FILL_QUANTITY: &[&str] = &["約定数量"];
pub const EXEC_COL_FILL_PRICE: &[&str] = &["約定単価"];
/// Trade column texts: order kind and whether the trade is on margin.
pub const EXEC_TRADE_KINDS: &[(&str, OrderKind, bool)] = &[
    ("信用新規買", OrderKind::Buy, true),
    ("信用新規売", OrderKind::Sell, true),
    ("信用返済買", OrderKind::CloseBuy, true),
    ("信用返済売", OrderKind::CloseSell, true),
    ("現物買", OrderKind::Buy, false),
    ("現物売", OrderKind::Sell, false),
];
pub const EXEC_COMPLETE: &[&str] = &["約定済", "完了"];
/// Compact fill timestamp `MM/DDHH:MM:SS`.
pub const EXEC_TIMESTAMP_LEN: usize = 13;

// repayment lot list (mobile)
pub const REPAY_TITLE_ENTRY: &[&str] = &["注文入力"];
pub const REPAY_TITLE_REPAYMENT: &[&str] = &["信用返済"];
pub const REPAY_CODE_INPUT: &str = "ipm_product_code";
pub const REPAY_KEY_INPUT: &str = "caIQ";
pub const REPAY_BATCH_SPECIFY: &[&str] = &["一括指定"];
/// The lot table is the n-th `table` opened after the batch-specify phrase.
pub const REPAY_TABLE_ORDINAL: usize = 1;
pub const REPAY_COL_OPENED_ON: &[&str] = &["建日"];
pub const REPAY_COL_OPEN_PRICE: &[&str] = &["建単価"];
pub const REPAY_COL_HELD: &[&str] = &["建株数"];
pub const REPAY_COL_QUANTITY: &[&str] = &["返済数量"];

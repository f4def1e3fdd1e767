use std::sync::Once;

use pretty_assertions::assert_eq;
use tradescrape_core::{
    update, Event, ExchangeTag, ExecutionHistoryEntry, ExtractError, Fill, OrderKind,
    OrderPrice, OrderResult, PageKind, PageProgram, PageResult, RepaymentLot, RepaymentLotList,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tradescrape_logging::initialize_for_tests);
}

fn run(kind: PageKind, events: &[Event]) -> PageResult {
    init_logging();
    events.iter().fold(PageProgram::new(kind), update).finish()
}

fn row(cell: &str, cells: &[&str]) -> Vec<Event> {
    let mut events = vec![Event::start("tr")];
    for text in cells {
        events.push(Event::start(cell));
        events.push(Event::text(text));
        events.push(Event::end(cell));
    }
    events.push(Event::end("tr"));
    events
}

fn table(rows: Vec<Vec<Event>>) -> Vec<Event> {
    let mut events = vec![Event::start("table")];
    events.extend(rows.into_iter().flatten());
    events.push(Event::end("table"));
    events
}

fn order_page(title: &str, display_id: Option<&str>, fields: &[&str]) -> Vec<Event> {
    let mut events = vec![
        Event::start_with("div", &[("class", "titletext")]),
        Event::text(title),
        Event::end("div"),
        Event::start("br"),
        Event::text("ご注文を受付いたしました。"),
        Event::start_with(
            "input",
            &[("type", "hidden"), ("name", "orderNum"), ("value", "998877")],
        ),
        Event::text("注文番号："),
    ];
    if let Some(id) = display_id {
        events.push(Event::text(id));
    }
    events.extend(table(vec![row("td", &["1301", "東証"])]));
    let pairs: Vec<Vec<Event>> = fields.chunks(2).map(|pair| row("td", pair)).collect();
    events.extend(table(pairs));
    events.extend(table(vec![row("td", &["ignored"])]));
    events
}

#[test]
fn market_order_result_reads_quantity_and_sentinel_price() {
    let events = order_page(
        "注文受付(現物買)",
        Some("1234"),
        &["株数", "100株", "価格", "成行"],
    );
    let result = run(PageKind::OrderResult, &events);
    assert_eq!(
        result,
        PageResult::OrderResult(Ok(OrderResult {
            accepted: true,
            internal_id: 998877,
            display_id: 1234,
            exchange_tag: ExchangeTag::Tokyo,
            code: 1301,
            quantity: 100,
            price: OrderPrice::Market,
            leveraged: false,
            order_kind: OrderKind::Buy,
        }))
    );
    if let PageResult::OrderResult(Ok(order)) = result {
        assert_eq!(order.price.value(), -1.0);
    }
}

#[test]
fn margin_limit_order_uses_price_after_slash() {
    let events = order_page(
        "信用注文受付(売)",
        Some("77"),
        &["数量", "200株", "価格", "指値/1,520円", "預り区分", "信用(制度)"],
    );
    let PageResult::OrderResult(Ok(order)) = run(PageKind::OrderResult, &events) else {
        panic!("order result not parsed");
    };
    assert_eq!(order.order_kind, OrderKind::Sell);
    assert!(order.leveraged);
    assert_eq!(order.quantity, 200);
    assert_eq!(order.price, OrderPrice::Limit(1520.0));
    assert_eq!(order.display_id, 77);
}

#[test]
fn cancel_result_has_no_display_id() {
    let events = order_page("取消受付", None, &["株数", "100株", "価格", "1,000"]);
    let PageResult::OrderResult(Ok(order)) = run(PageKind::OrderResult, &events) else {
        panic!("order result not parsed");
    };
    assert_eq!(order.order_kind, OrderKind::Cancel);
    assert_eq!(order.internal_id, 998877);
    assert_eq!(order.display_id, -1);
}

#[test]
fn amend_result_ignores_display_id_text() {
    let events = order_page("訂正受付", Some("55"), &["株数", "300株", "価格", "2,000"]);
    let PageResult::OrderResult(Ok(order)) = run(PageKind::OrderResult, &events) else {
        panic!("order result not parsed");
    };
    assert_eq!(order.order_kind, OrderKind::Amend);
    assert_eq!(order.internal_id, 998877);
    assert_eq!(order.display_id, -1);
    assert_eq!(order.quantity, 300);
    assert_eq!(order.price, OrderPrice::Limit(2000.0));
}

#[test]
fn order_without_acceptance_wording_fails() {
    let mut events = order_page("注文受付(買)", Some("1"), &["株数", "100"]);
    events.retain(|event| event != &Event::text("ご注文を受付いたしました。"));
    assert_eq!(
        run(PageKind::OrderResult, &events),
        PageResult::OrderResult(Err(ExtractError::StructureMismatch {
            program: "order result",
            waypoint: "acceptance"
        }))
    );
}

#[test]
fn no_orders_phrase_is_an_empty_success() {
    let events = [
        Event::start("body"),
        Event::start("p"),
        Event::text("お客様の株式注文はございません"),
        Event::end("p"),
        Event::end("body"),
    ];
    let result = run(PageKind::ExecutionHistory, &events);
    assert_eq!(result, PageResult::ExecutionHistory(Ok(vec![])));
    assert!(result.parsed_ok());
}

fn history_page(data_rows: Vec<Vec<Event>>) -> Vec<Event> {
    let mut events = vec![
        Event::start("div"),
        Event::text("注文一覧"),
        Event::end("div"),
    ];
    events.extend(table(vec![row("td", &["検索条件"])]));
    let mut rows = vec![
        row("th", &["注文番号", "銘柄", "取引", "状況"]),
        row("th", &["区分", "約定日時", "約定数量", "約定単価"]),
    ];
    rows.extend(data_rows);
    events.extend(table(rows));
    events
}

#[test]
fn execution_history_groups_fills_under_orders() {
    let events = history_page(vec![
        row("td", &["12345", "極洋\n1301 東証", "信用新規買", "約定済"]),
        row("td", &["約定", "05/12\n14:32:10", "100株", "3,450"]),
        row("td", &["約定", "--", "0", "0"]),
        row("td", &["約定", "05/1214:35:00", "200株", "3,455"]),
        row("td", &["12346", "トヨタ自動車\n7203 PTS", "現物売", "受付中"]),
    ]);
    assert_eq!(
        run(PageKind::ExecutionHistory, &events),
        PageResult::ExecutionHistory(Ok(vec![
            ExecutionHistoryEntry {
                display_id: 12345,
                order_kind: OrderKind::Buy,
                exchange_tag: ExchangeTag::Tokyo,
                code: 1301,
                leveraged: true,
                complete: true,
                fills: vec![
                    Fill {
                        timestamp: "05/12 14:32:10".into(),
                        quantity: 100,
                        price: 3450.0,
                    },
                    Fill {
                        timestamp: "05/12 14:35:00".into(),
                        quantity: 200,
                        price: 3455.0,
                    },
                ],
            },
            ExecutionHistoryEntry {
                display_id: 12346,
                order_kind: OrderKind::Sell,
                exchange_tag: ExchangeTag::Pts,
                code: 7203,
                leveraged: false,
                complete: false,
                fills: vec![],
            },
        ]))
    );
}

#[test]
fn execution_history_rejects_unknown_trade() {
    let events = history_page(vec![row("td", &["1", "極洋 1301 東証", "投信買付", "受付中"])]);
    assert_eq!(
        run(PageKind::ExecutionHistory, &events),
        PageResult::ExecutionHistory(Err(ExtractError::UnknownTradeKind {
            text: "投信買付".into()
        }))
    );
}

#[test]
fn execution_history_without_heading_fails() {
    let events = table(vec![row("td", &["12345"])]);
    let result = run(PageKind::ExecutionHistory, &events);
    assert!(!result.parsed_ok());
}

fn lot_row(opened_on: &str, price: &str, held: &str, field: &str) -> Vec<Event> {
    let mut events = row("td", &[opened_on, price, held]);
    let close = events.pop();
    events.push(Event::start("td"));
    events.push(Event::start_with("input", &[("type", "text"), ("name", field)]));
    events.push(Event::end("td"));
    events.extend(close);
    events
}

#[test]
fn repayment_lots_carry_quantity_field_names() {
    let mut events = vec![
        Event::start("title"),
        Event::text("信用返済 注文入力"),
        Event::end("title"),
        Event::start_with(
            "input",
            &[("type", "hidden"), ("name", "ipm_product_code"), ("value", "1301")],
        ),
        Event::start_with("input", &[("type", "hidden"), ("name", "caIQ"), ("value", "k-9f2")]),
        Event::start("p"),
        Event::text("一括指定"),
        Event::end("p"),
    ];
    events.extend(table(vec![
        row("th", &["建日", "建単価", "建株数", "返済数量"]),
        lot_row("26/09/30", "3,400", "100株", "qty_0"),
        lot_row("26/10/02", "−", "200株", "qty_1"),
    ]));
    assert_eq!(
        run(PageKind::RepaymentLots, &events),
        PageResult::RepaymentLots(Ok(RepaymentLotList {
            code: 1301,
            form_key: "k-9f2".into(),
            lots: vec![
                RepaymentLot {
                    opened_on: "26/09/30".into(),
                    open_price: 3400.0,
                    held: 100,
                    quantity_field: "qty_0".into(),
                },
                RepaymentLot {
                    opened_on: "26/10/02".into(),
                    open_price: -1.0,
                    held: 200,
                    quantity_field: "qty_1".into(),
                },
            ],
        }))
    );
}

#[test]
fn repayment_column_mismatch_is_hard_failure() {
    let mut events = vec![
        Event::start("title"),
        Event::text("信用返済 注文入力"),
        Event::end("title"),
        Event::start_with("input", &[("name", "ipm_product_code"), ("value", "1301")]),
        Event::text("一括指定"),
    ];
    let mut short = row("td", &["26/09/30"]);
    let close = short.pop();
    short.push(Event::start("td"));
    short.push(Event::start_with("input", &[("type", "text"), ("name", "qty_0")]));
    short.push(Event::end("td"));
    short.extend(close);
    events.extend(table(vec![
        row("th", &["建日", "建単価", "建株数", "返済数量"]),
        short,
    ]));
    assert_eq!(
        run(PageKind::RepaymentLots, &events),
        PageResult::RepaymentLots(Err(ExtractError::ShapeMismatch {
            expected: 4,
            found: 2
        }))
    );
}

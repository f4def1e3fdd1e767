use std::sync::Once;

use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;
use tradescrape_core::{
    ExtractError, LoginStatus, OrderKind, OrderPrice, OwnedPositions, OwnedSpotPosition,
    PageKind, PageResult, PortfolioWatchEntry, RepaymentLotsProgram, WatchListProgram,
};
use tradescrape_engine::{
    parse_page, run_program, DecodeError, EngineError, EngineSettings, SiteEncoding,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tradescrape_logging::initialize_for_tests);
}

fn shift_jis(html: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(html);
    assert!(!had_errors, "fixture not encodable as Shift_JIS");
    bytes.into_owned()
}

fn parse(bytes: &[u8], encoding: SiteEncoding, kind: PageKind) -> PageResult {
    init_logging();
    parse_page(bytes, encoding.label(), kind, &EngineSettings::default()).unwrap()
}

#[test]
fn mobile_login_with_logout_link() {
    let html = r#"<html><body>
        <p>ようこそ</p>
        <a href="/m/logout">ログアウト</a>
    </body></html>"#;
    assert_eq!(
        parse(html.as_bytes(), SiteEncoding::Utf8, PageKind::LoginMobile),
        PageResult::Login(LoginStatus {
            success: true,
            logged_in: true,
            notice_present: false,
        })
    );
}

#[test]
fn shift_jis_owned_positions_merge_spot_rows() {
    let html = r#"<html><head><title>ポートフォリオ</title></head><body>
        <div class="title-text">ポートフォリオ</div>
        <b>株式（現物/一般預り）</b>
        <table>
          <tr><th>銘柄</th><th>保有株数</th><th>評価額</th></tr>
          <tr><td>1301 極洋</td><td>100</td><td>345,000</td></tr>
          <tr><td>1301 極洋</td><td>200</td><td>690,000</td></tr>
        </table>
    </body></html>"#;
    assert_eq!(
        parse(&shift_jis(html), SiteEncoding::ShiftJis, PageKind::OwnedPositions),
        PageResult::OwnedPositions(Ok(OwnedPositions {
            spot: vec![OwnedSpotPosition {
                code: 1301,
                quantity: 300
            }],
            margin: vec![],
        }))
    );
}

#[test]
fn market_order_result_page() {
    let html = r#"<html><body>
        <div class="titletext">注文受付(現物買)</div>
        <br>ご注文を受付いたしました。
        <form><input type="hidden" name="orderNum" value="998877"></form>
        注文番号：<span>20261018</span>
        <table><tr><td>1301</td><td>東証</td></tr></table>
        <table>
          <tr><td>株数</td><td>100株</td></tr>
          <tr><td>価格</td><td>成行</td></tr>
        </table>
    </body></html>"#;
    let PageResult::OrderResult(Ok(order)) =
        parse(html.as_bytes(), SiteEncoding::Utf8, PageKind::OrderResult)
    else {
        panic!("order result page not parsed");
    };
    assert_eq!(order.order_kind, OrderKind::Buy);
    assert_eq!(order.internal_id, 998877);
    assert_eq!(order.display_id, 20261018);
    assert_eq!(order.exchange_tag.as_str(), "TKY");
    assert_eq!(order.code, 1301);
    assert_eq!(order.quantity, 100);
    assert_eq!(order.price, OrderPrice::Market);
    assert_eq!(order.price.value(), -1.0);
}

#[test]
fn execution_history_without_orders() {
    let html = r#"<html><head><title>注文照会</title></head><body>
        <div class="message">お客様の株式注文はございません</div>
    </body></html>"#;
    assert_eq!(
        parse(&shift_jis(html), SiteEncoding::ShiftJis, PageKind::ExecutionHistory),
        PageResult::ExecutionHistory(Ok(vec![]))
    );
}

#[test]
fn row_span_repeats_code_into_spanned_rows() {
    let html = r#"<html><body>
        <select name="portforio_id"><option value="1">1</option></select>
        <input type="submit" value="情報更新">
        <table>
          <tr><th>銘柄</th><th>現在値</th></tr>
          <tr><td rowspan="3">1301</td><td>3,450</td></tr>
          <tr><td>3,451</td></tr>
          <tr><td>−</td></tr>
        </table>
    </body></html>"#;
    let entries = run_program(html, WatchListProgram::new()).unwrap();
    let quotes: Vec<(u32, f64)> = entries
        .iter()
        .map(|entry: &PortfolioWatchEntry| (entry.code, entry.last))
        .collect();
    assert_eq!(quotes, vec![(1301, 3450.0), (1301, 3451.0), (1301, -1.0)]);
}

#[test]
fn repayment_quantity_inputs_are_read_from_cells() {
    let html = r#"<html><head><title>信用返済 注文入力</title></head><body>
        <form>
        <input type="hidden" name="ipm_product_code" value="7203">
        <input type="hidden" name="caIQ" value="a1b2">
        <p>一括指定</p>
        <table>
          <tr><th>建日</th><th>建単価</th><th>建株数</th><th>返済数量</th></tr>
          <tr><td>26/10/01</td><td>2,500</td><td>100株</td>
              <td><input type="text" name="lot_q0"></td></tr>
        </table>
        </form>
    </body></html>"#;
    let list = run_program(html, RepaymentLotsProgram::new()).unwrap();
    assert_eq!(list.code, 7203);
    assert_eq!(list.form_key, "a1b2");
    assert_eq!(list.lots.len(), 1);
    assert_eq!(list.lots[0].quantity_field, "lot_q0");
    assert_eq!(list.lots[0].held, 100);
}

#[test]
fn missing_markers_are_a_result_not_an_error() {
    let html = "<html><body><p>メンテナンス中</p></body></html>";
    let result = parse(html.as_bytes(), SiteEncoding::Utf8, PageKind::WatchList);
    assert!(!result.parsed_ok());
    assert!(matches!(
        result,
        PageResult::WatchList(Err(ExtractError::StructureMismatch { .. }))
    ));
}

#[test]
fn oversized_page_is_rejected() {
    let settings = EngineSettings {
        max_bytes: 8,
        ..EngineSettings::default()
    };
    let err = parse_page(b"<html></html>", "utf-8", PageKind::LoginPc, &settings).unwrap_err();
    assert_eq!(
        err,
        EngineError::TooLarge {
            max_bytes: 8,
            actual: 13
        }
    );
}

#[test]
fn unknown_label_is_rejected_when_detection_is_off() {
    let settings = EngineSettings {
        detect_unknown_encoding: false,
        ..EngineSettings::default()
    };
    let err = parse_page(b"<html></html>", "x-unknown", PageKind::LoginPc, &settings).unwrap_err();
    assert_eq!(
        err,
        EngineError::Decode(DecodeError::UnknownLabel {
            label: "x-unknown".into()
        })
    );
}

#[test]
fn unknown_label_falls_back_to_detection() {
    let html = "<html><body><a href=\"/logout\">ログアウト</a></body></html>";
    init_logging();
    let result = parse_page(
        html.as_bytes(),
        "x-unknown",
        PageKind::LoginMobile,
        &EngineSettings::default(),
    )
    .unwrap();
    assert!(result.parsed_ok());
}

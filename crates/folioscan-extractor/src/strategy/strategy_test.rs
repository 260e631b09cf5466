use super::*;

fn row(cells: &[&str]) -> RawFragment {
    RawFragment {
        cells: cells.iter().map(|c| (*c).to_string()).collect(),
        text: cells.join(" "),
        selector: "table tr".to_string(),
    }
}

fn card(text: &str) -> RawFragment {
    RawFragment {
        cells: vec![],
        text: text.to_string(),
        selector: "[class*='holding']".to_string(),
    }
}

const CARD_TEXT: &str =
    "Nuvama Wealth19 sharesAvg. ₹5,168.90₹6,930.0077.00 (1.12%)+₹33,460.9034.07%₹1,31,670.00₹98,209.10";

// ---------------------------------------------------------------------------
// Structured-cell strategy
// ---------------------------------------------------------------------------

#[test]
fn structured_eight_cell_row_maps_positionally() {
    let fragment = row(&[
        "Nuvama Wealth",
        "19",
        "5168.90",
        "6930.00",
        "98209.10",
        "131670.00",
        "77.00",
        "33460.90",
    ]);
    let record = build_record(&fragment).expect("row should yield a record");

    assert_eq!(record.name.as_deref(), Some("Nuvama Wealth"));
    assert!((record.units - 19.0).abs() < 1e-9);
    assert!((record.average_buy_price - 5168.90).abs() < 1e-9);
    assert!((record.current_price - 6930.00).abs() < 1e-9);
    assert!((record.invested_value - 98_209.10).abs() < 1e-9);
    assert!((record.current_value - 131_670.00).abs() < 1e-9);
    assert!((record.profit_loss - 33_460.90).abs() < 1e-9);
}

#[test]
fn structured_row_with_symbol_column_shifts_mapping() {
    let fragment = row(&[
        "Nuvama Wealth",
        "NUVAMA",
        "19",
        "5168.90",
        "6930.00",
        "98209.10",
        "131670.00",
        "77.00 (1.12%)",
    ]);
    let record = build_record(&fragment).expect("row should yield a record");

    assert_eq!(record.symbol.as_deref(), Some("NUVAMA"));
    assert!((record.units - 19.0).abs() < 1e-9);
    assert!((record.current_value - 131_670.00).abs() < 1e-9);
    assert!((record.day_change_percentage - 1.12).abs() < 1e-9);
}

#[test]
fn structured_seven_cell_row_derives_profit_loss() {
    let fragment = row(&[
        "Nuvama Wealth",
        "19",
        "5168.90",
        "6930.00",
        "98209.10",
        "131670.00",
        "77.00",
    ]);
    let record = build_record(&fragment).expect("row should yield a record");
    assert!((record.profit_loss - 33_460.90).abs() < 1e-6);
}

#[test]
fn structured_row_with_currency_marked_cells() {
    let fragment = row(&[
        "Infosys",
        "10",
        "₹1,400.00",
        "₹1,500.00",
        "₹14,000.00",
        "₹15,000.00",
        "₹25.00",
    ]);
    let record = build_record(&fragment).expect("row should yield a record");
    assert!((record.invested_value - 14_000.0).abs() < 1e-9);
    assert!((record.profit_loss - 1000.0).abs() < 1e-6);
}

#[test]
fn six_cell_row_is_not_structured() {
    // Too few cells for the positional contract; the free-text fallback
    // sees no currency markers or unit labels either.
    let fragment = row(&["Infosys", "10", "1400", "1500", "14000", "15000"]);
    assert!(build_record(&fragment).is_none());
}

// ---------------------------------------------------------------------------
// Free-text strategy
// ---------------------------------------------------------------------------

#[test]
fn free_text_card_matches_structured_row() {
    let record = build_record(&card(CARD_TEXT)).expect("card should yield a record");

    assert_eq!(record.name.as_deref(), Some("Nuvama Wealth"));
    assert!((record.units - 19.0).abs() < 1e-9);
    assert!((record.average_buy_price - 5168.90).abs() < 1e-9);
    assert!((record.current_price - 6930.00).abs() < 1e-9);
    assert!((record.invested_value - 98_209.10).abs() < 1e-9);
    assert!((record.current_value - 131_670.00).abs() < 1e-9);
    assert!((record.profit_loss - 33_460.90).abs() < 1e-9);
    assert!((record.day_change_percentage - 1.12).abs() < 1e-9);
}

#[test]
fn both_strategies_converge_on_derived_percentage() {
    let structured = build_record(&row(&[
        "Nuvama Wealth",
        "19",
        "5168.90",
        "6930.00",
        "98209.10",
        "131670.00",
        "77.00",
        "33460.90",
    ]))
    .unwrap();
    let free_text = build_record(&card(CARD_TEXT)).unwrap();

    assert!(
        (structured.profit_loss_percentage - free_text.profit_loss_percentage).abs() < 1e-6,
        "both strategies must derive the same P&L percentage"
    );
    assert!((structured.profit_loss_percentage - 34.0711).abs() < 1e-3);
}

#[test]
fn free_text_negative_profit_loss() {
    let record =
        build_record(&card("Paytm7 sharesAvg. ₹900.00₹620.00-₹1,960.00")).unwrap();
    assert!((record.profit_loss - -1960.0).abs() < 1e-9);
    assert!((record.units - 7.0).abs() < 1e-9);
}

#[test]
fn free_text_with_few_tokens_leaves_values_for_derivation() {
    let record = build_record(&card("Infosys 10 shares Avg. ₹1,400.00")).unwrap();
    assert!((record.invested_value - 14_000.0).abs() < 1e-6, "derived");
    assert!((record.current_value - 0.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Skip and rejection rules
// ---------------------------------------------------------------------------

#[test]
fn header_row_is_skipped() {
    assert!(build_record(&card("Stock Name Symbol Quantity")).is_none());
}

#[test]
fn header_vocabulary_only_fragment_is_skipped() {
    assert!(build_record(&card("Current Price | Invested | Current Value | Day Change | P&L")).is_none());
}

#[test]
fn short_fragment_is_skipped() {
    assert!(build_record(&card("₹5.00")).is_none());
}

#[test]
fn fragment_with_digits_is_not_mistaken_for_header() {
    let record = build_record(&card("Holding Corp Ltd 5 shares Avg. ₹120.00"));
    assert!(record.is_some(), "a data row containing header words must survive");
}

#[test]
fn nameless_zero_value_fragment_is_rejected() {
    // Long enough to pass the skip rules and carrying a currency token, but
    // it identifies nothing and every monetary field is zero.
    assert!(build_record(&card("--- ₹0.00 ----")).is_none());
}

// ---------------------------------------------------------------------------
// Supplements
// ---------------------------------------------------------------------------

#[test]
fn isin_is_captured_from_fragment_text() {
    let record =
        build_record(&card("Infosys INE009A01021 10 shares Avg. ₹1,400.00")).unwrap();
    assert_eq!(record.isin.as_deref(), Some("INE009A01021"));
}

#[test]
fn extracted_at_is_populated() {
    let record = build_record(&card(CARD_TEXT)).unwrap();
    assert!(record.extracted_at <= chrono::Utc::now());
}

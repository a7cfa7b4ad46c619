use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use skinsales_terminal::catalog::parse_champion_full_json;
use skinsales_terminal::sale_feed::{SheetTab, feed_url, parse_sales_json, parse_week};
use skinsales_terminal::state::SaleCategory;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_current_sales_fixture() {
    let raw = read_fixture("current_sales.json");
    let records = parse_sales_json(&raw).expect("fixture should parse");

    // The all-empty row is dropped; the typo'd champion is kept for the
    // resolver to reject later.
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].champion, "Ahri");
    assert_eq!(records[0].price, 675);
    assert_eq!(records[0].discount, Some(50));
    assert_eq!(records[2].champion, "Jhinn");
}

#[test]
fn parses_stringly_typed_numbers() {
    let raw = read_fixture("current_sales.json");
    let records = parse_sales_json(&raw).expect("fixture should parse");

    let mf = &records[1];
    assert_eq!(mf.champion, "Miss Fortune");
    assert_eq!(mf.price, 910);
    assert_eq!(mf.discount, Some(55));
}

#[test]
fn parses_previous_sales_weeks() {
    let raw = read_fixture("previous_sales.json");
    let records = parse_sales_json(&raw).expect("fixture should parse");
    assert_eq!(records.len(), 3);

    let aug4 = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    let jul28 = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
    assert_eq!(records[0].week, Some(aug4));
    assert_eq!(records[1].week, Some(aug4));
    assert_eq!(records[2].week, Some(jul28));
    assert_eq!(records[0].week_raw.as_deref(), Some("2025-08-04T00:00:00.000Z"));
}

#[test]
fn parses_mythic_categories_and_patch() {
    let raw = read_fixture("mythic_sales.json");
    let records = parse_sales_json(&raw).expect("fixture should parse");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].category, Some(SaleCategory::Featured));
    assert_eq!(records[1].category, Some(SaleCategory::Biweekly));
    assert_eq!(records[0].patch.as_deref(), Some("15.24.1"));
}

#[test]
fn null_and_empty_bodies_are_empty() {
    assert!(parse_sales_json("null").expect("null should parse").is_empty());
    assert!(parse_sales_json("").expect("empty should parse").is_empty());
    assert!(parse_sales_json("  \n ").expect("blank should parse").is_empty());
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let raw = r#"[
        {"champion": "Ahri", "skin": "Popstar Ahri", "price": 675},
        "not an object",
        42,
        {"champion": "Akali", "skin": "K/DA Akali", "price": 607}
    ]"#;
    let records = parse_sales_json(raw).expect("batch should survive bad rows");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].champion, "Ahri");
    assert_eq!(records[1].champion, "Akali");
}

#[test]
fn parses_champion_full_fixture() {
    let raw = read_fixture("champion_full.json");
    let catalog = parse_champion_full_json(&raw).expect("fixture should parse");
    assert_eq!(catalog.len(), 5);

    let ahri = catalog.get("Ahri").expect("Ahri should be present");
    assert_eq!(ahri.name, "Ahri");
    assert_eq!(ahri.skins.len(), 3);
    assert_eq!(ahri.skins[1].name, "Popstar Ahri");
    assert_eq!(ahri.skins[1].num, 4);
}

#[test]
fn champion_full_null_is_empty() {
    let catalog = parse_champion_full_json("null").expect("null should parse");
    assert!(catalog.is_empty());
}

#[test]
fn week_parsing_accepts_both_formats() {
    let aug4 = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    assert_eq!(parse_week("2025-08-04"), Some(aug4));
    assert_eq!(parse_week("2025-08-04T00:00:00.000Z"), Some(aug4));
    assert_eq!(parse_week(" 2025-08-04 "), Some(aug4));
    assert_eq!(parse_week("last monday"), None);
}

#[test]
fn feed_url_selects_sheet_by_query_param() {
    let current = feed_url(SheetTab::CurrentSales);
    let mythic = feed_url(SheetTab::Mythic);
    let previous = feed_url(SheetTab::PreviousSales);

    assert!(!current.contains("sheet="));
    assert!(mythic.ends_with("?sheet=Mythic"));
    assert!(previous.ends_with("?sheet=Previous%20Skin%20Sales"));
}

use std::env;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::fetch_body;
use crate::state::{SaleCategory, SaleRecord, Screen};

const SALES_FEED_URL: &str =
    "https://script.google.com/macros/s/AKfycbxqlNW0mNo7FsGo0hR2_2jwJ_WAxC1HiJoKB92Sfupv_1llL1vz04DKRivr-vxPtpQwvQ/exec";

/// Logical sheet inside the shared spreadsheet endpoint, selected by query
/// parameter. The default (no parameter) is the current-sales sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTab {
    CurrentSales,
    Mythic,
    PreviousSales,
}

impl SheetTab {
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            SheetTab::CurrentSales => None,
            SheetTab::Mythic => Some("Mythic"),
            SheetTab::PreviousSales => Some("Previous%20Skin%20Sales"),
        }
    }

    pub fn screen(self) -> Screen {
        match self {
            SheetTab::CurrentSales => Screen::Sales,
            SheetTab::Mythic => Screen::Mythic,
            SheetTab::PreviousSales => Screen::History,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SheetTab::CurrentSales => "current sales",
            SheetTab::Mythic => "mythic shop",
            SheetTab::PreviousSales => "previous sales",
        }
    }
}

pub fn feed_url(tab: SheetTab) -> String {
    let base = env::var("SALES_FEED_URL")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| SALES_FEED_URL.to_string());
    match tab.query_value() {
        Some(sheet) => format!("{base}?sheet={sheet}"),
        None => base,
    }
}

pub fn fetch_sales(tab: SheetTab) -> Result<Vec<SaleRecord>> {
    let body = fetch_body(&feed_url(tab)).context("sale feed request failed")?;
    parse_sales_json(&body)
}

// The sheet rows are hand-entered, so every field is optional and numbers
// sometimes arrive as strings. Rows that carry neither a champion nor a
// skin name are dropped; anything else is kept and resolved downstream.
#[derive(Debug, Deserialize)]
struct RawSale {
    #[serde(default)]
    champion: String,
    #[serde(default)]
    skin: String,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    discount: Value,
    #[serde(default)]
    spotlight: String,
    #[serde(default)]
    week: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    patch: Option<String>,
}

pub fn parse_sales_json(raw: &str) -> Result<Vec<SaleRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_str(trimmed).context("invalid sale feed json")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Ok(sale) = serde_json::from_value::<RawSale>(row) else {
            continue;
        };
        if sale.champion.trim().is_empty() && sale.skin.trim().is_empty() {
            continue;
        }
        let week_raw = sale.week.filter(|w| !w.trim().is_empty());
        records.push(SaleRecord {
            champion: sale.champion.trim().to_string(),
            skin: sale.skin.trim().to_string(),
            price: lenient_u32(&sale.price).unwrap_or(0),
            discount: lenient_u32(&sale.discount),
            spotlight: sale.spotlight.trim().to_string(),
            week: week_raw.as_deref().and_then(parse_week),
            week_raw,
            category: sale.category.as_deref().and_then(parse_category),
            patch: sale.patch.filter(|p| !p.trim().is_empty()),
        });
    }
    Ok(records)
}

fn lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(num) => num.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn parse_category(raw: &str) -> Option<SaleCategory> {
    match raw.trim().to_lowercase().as_str() {
        "featured" => Some(SaleCategory::Featured),
        "biweekly" => Some(SaleCategory::Biweekly),
        _ => None,
    }
}

/// Sheet exports dates either as RFC 3339 timestamps or bare `YYYY-MM-DD`.
pub fn parse_week(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
}

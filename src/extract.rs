use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.tm-row-selectable").unwrap());
static VALUE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.table-cell-value.tm-value").unwrap());
static TIME_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("time[datetime]").unwrap());

// Price cells carry the currency icon class; plain value cells do not.
const CURRENCY_MARKER: &str = "icon-ton";

/// One listing row as found in the markup. Every field is independently
/// optional; missing pieces are resolved by `into_candidate`.
#[derive(Debug)]
pub struct RawRow {
    pub username: Option<String>,
    pub price: Option<String>,
    pub sale_date: Option<NaiveDateTime>,
}

/// A complete row, ready for price normalization and persistence.
#[derive(Debug, Clone)]
pub struct SaleCandidate {
    pub username: String,
    pub price_raw: String,
    pub sale_date: NaiveDateTime,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropReason {
    #[error("username missing")]
    MissingUsername,
    #[error("price missing")]
    MissingPrice,
    #[error("sale timestamp missing or unparseable")]
    MissingTimestamp,
}

impl RawRow {
    /// Combine the per-field results into a candidate, or say which field
    /// was missing. Empty strings count as missing.
    pub fn into_candidate(self) -> Result<SaleCandidate, DropReason> {
        let username = match self.username {
            Some(u) if !u.is_empty() => u,
            _ => return Err(DropReason::MissingUsername),
        };
        let price_raw = match self.price {
            Some(p) if !p.is_empty() => p,
            _ => return Err(DropReason::MissingPrice),
        };
        let sale_date = self.sale_date.ok_or(DropReason::MissingTimestamp)?;
        Ok(SaleCandidate {
            username,
            price_raw,
            sale_date,
        })
    }
}

/// Extract all selectable listing rows in document order. Rows missing
/// fields are kept here; filtering happens at candidate construction.
pub fn extract_rows(html: &str) -> Vec<RawRow> {
    let doc = Html::parse_document(html);
    doc.select(&ROW_SEL).map(parse_row).collect()
}

fn parse_row(row: ElementRef) -> RawRow {
    let mut username = None;
    let mut price = None;

    for cell in row.select(&VALUE_SEL) {
        let is_price = cell.value().classes().any(|c| c == CURRENCY_MARKER);
        if is_price {
            if price.is_none() {
                price = Some(cell_text(cell));
            }
        } else if username.is_none() {
            username = Some(cell_text(cell));
        }
    }

    let sale_date = row
        .select(&TIME_SEL)
        .next()
        .and_then(|t| t.value().attr("datetime"))
        .and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warn!("Unparseable sale timestamp: {}", raw);
            }
            parsed
        });

    RawRow {
        username,
        price,
        sale_date,
    }
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// ISO-8601, with or without an offset. An offset is discarded without
/// conversion: the stored value is the wall-clock time as written.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| raw.parse::<NaiveDateTime>())
        .ok()
}

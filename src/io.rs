//! Helpers for reading purchase data and formatting report text

use std::{io::Read, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Terminator};
use log::debug;
use rust_decimal::Decimal;

use crate::{errors::Error, types::Purchase};

/// Reads an entire purchase stream into memory and parses it.
///
/// See [`parse_purchase_csv`] for the expected format.
pub fn read_purchases<R: Read>(reader: &mut R) -> Result<Vec<Purchase>, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_purchase_csv(&text)
}

/// Parses purchases from a string of CSV data.
///
/// Expects one purchase per line, without a header, in this format:
/// ```csv
/// shoes,2015-02-11,49.99,TOPS
/// shirt,2015-01-22,15.50,REK
/// ```
///
/// No field is trimmed and nothing is quoted. Every line produces exactly one [`Purchase`],
/// blank lines included; a field that is missing or fails to parse is stored as `None` (or
/// the empty string, for text fields) instead of causing an error.
pub fn parse_purchase_csv(text: &str) -> Result<Vec<Purchase>, Error> {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'));

    let mut purchases = Vec::new();
    let mut fields = StringRecord::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut csv_reader = builder.from_reader(line.as_bytes());
        if !csv_reader.read_record(&mut fields)? {
            fields.clear();
        }
        let purchase = Purchase::new(
            fields.get(0).unwrap_or_default(),
            fields.get(1).and_then(parse_date),
            fields.get(2).and_then(coerce_number),
            fields.get(3).unwrap_or_default(),
        );
        if purchase.date.is_none() || purchase.price.is_none() {
            debug!("Line {:?} has an unreadable date or price", line);
        }
        purchases.push(purchase);
    }
    Ok(purchases)
}

/// Reads an ISO 8601 date, local date-time, or RFC 3339 timestamp, keeping only the calendar
/// date. Surrounding whitespace is ignored.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::from_str(text).map(|datetime| datetime.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|datetime| datetime.date_naive()))
        .ok()
}

/// Converts text to a number the way a form field or CSV cell is read: surrounding whitespace
/// is ignored, blank text counts as zero, and plain or scientific notation is accepted, as are
/// unsigned `0x`, `0o` and `0b` integers up to [`u64::MAX`].
///
/// Returns `None` if the text is not a number. That includes digit separators (`1_000`),
/// `Infinity`, and anything whose magnitude is beyond [`Decimal::MAX`] (about `7.9e28`), such
/// as `1e30`.
pub fn coerce_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    if text.contains('_') {
        return None;
    }
    if let Some((radix, digits)) = radix_prefixed(text) {
        if digits.is_empty() || !digits.chars().all(|digit| digit.is_digit(radix)) {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(Decimal::from);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Splits a `0x`, `0o` or `0b` prefix off an integer literal
fn radix_prefixed(text: &str) -> Option<(u32, &str)> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

/// Builds the heading printed above a purchase history chart
#[must_use]
pub fn history_title(item: Option<&str>, store: Option<&str>) -> String {
    format!(
        "Purchase history for {}s at {}.",
        item.unwrap_or("all item"),
        store.unwrap_or("all stores")
    )
}

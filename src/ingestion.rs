use crate::error::{EngineError, Result};
use crate::schema::Record;
use crate::utils::parse_date;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// One raw feed row: header name to cell text, exactly as the feed supplied
/// them. Header normalization happens here, not in the feed readers.
pub type RawRow = BTreeMap<String, String>;

/// One raw tabular feed. An empty table models an absent or failed feed.
pub type RawTable = Vec<RawRow>;

/// Reads a headered CSV file into a raw table.
///
/// A missing or unreadable file surfaces as an error so the caller can decide
/// to continue with the other feed (pass an empty table to
/// [`normalize_feeds`]) or abort.
pub fn load_csv_feed<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), value.to_string());
        }
        rows.push(row);
    }

    debug!("loaded {} rows from CSV feed", rows.len());
    Ok(rows)
}

/// Trim, lowercase, and collapse inner whitespace so that the two feeds'
/// header conventions ("Offer Type", " offer  type ") unify into one schema.
fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_row(raw: &RawRow) -> RawRow {
    raw.iter()
        .map(|(key, value)| (normalize_header(key), value.clone()))
        .collect()
}

/// Blank and unparsable cells are zero, never an error. Guards against the
/// literal strings "nan"/"inf" parsing into non-finite floats.
fn coerce_numeric(raw: &str) -> f64 {
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

fn measure(row: &RawRow, names: &[&str]) -> f64 {
    for name in names {
        if let Some(raw) = row.get(*name) {
            return coerce_numeric(raw);
        }
    }
    0.0
}

fn text(row: &RawRow, name: &str) -> String {
    row.get(name).map(|raw| raw.trim().to_string()).unwrap_or_default()
}

fn build_record(row: &RawRow, date: NaiveDate) -> Record {
    Record {
        date,
        channel: text(row, "channel"),
        campaign: text(row, "campaign"),
        account: text(row, "account"),
        offer_type: text(row, "offer type"),
        region: text(row, "region"),
        impressions: measure(row, &["impressions"]),
        clicks: measure(row, &["clicks"]),
        cost: measure(row, &["cost"]),
        channel_leads: measure(row, &["channel leads"]),
        channel_bookings: measure(row, &["channel bookings"]),
        // The sheet feed hyphenates this header; tolerate a spaced variant.
        ga_bookings: measure(row, &["ga-booking", "ga booking"]),
        year: measure(row, &["year"]) as i32,
    }
}

/// Merges the two raw feeds into one normalized record set.
///
/// Both feeds non-empty: all rows are kept, in feed order, with no
/// deduplication. Exactly one non-empty: the engine proceeds on it alone.
/// Both empty: fatal, there is nothing to report on.
///
/// Rows whose date fails to parse are dropped and counted; every declared
/// numeric measure coerces to a finite number. If no `date` column exists in
/// any feed after header normalization, that is fatal as well.
pub fn normalize_feeds(file_feed: &RawTable, api_feed: &RawTable) -> Result<Vec<Record>> {
    if file_feed.is_empty() && api_feed.is_empty() {
        return Err(EngineError::NoData);
    }
    if file_feed.is_empty() {
        warn!("file feed is empty, continuing with the API feed only");
    }
    if api_feed.is_empty() {
        warn!("API feed is empty, continuing with the file feed only");
    }

    let total_rows = file_feed.len() + api_feed.len();
    let mut records = Vec::with_capacity(total_rows);
    let mut date_column_seen = false;
    let mut dropped = 0usize;

    for raw in file_feed.iter().chain(api_feed.iter()) {
        let row = normalize_row(raw);
        match row.get("date") {
            Some(raw_date) => {
                date_column_seen = true;
                match parse_date(raw_date) {
                    Some(date) => records.push(build_record(&row, date)),
                    None => dropped += 1,
                }
            }
            None => dropped += 1,
        }
    }

    if !date_column_seen {
        return Err(EngineError::MissingColumn("date".to_string()));
    }

    if dropped > 0 {
        debug!("dropped {} of {} raw rows with missing or unparsable dates", dropped, total_rows);
    }
    debug!("normalized {} records from {} raw rows", records.len(), total_rows);

    Ok(records)
}

//! Search, category filter and ordering for the events listing.
//!
//! Works on directory results; the directory itself never filters by text.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::models::Event;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Soonest first
    #[default]
    Date,
    /// Title, alphabetical
    Name,
    /// Most open spots first
    Spots,
}

/// Query string of `GET /api/events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

/// Filter and order `events` as the listing shows them.
pub fn apply(mut events: Vec<Event>, query: &BrowseQuery) -> Vec<Event> {
    if let Some(term) = non_blank(&query.search) {
        let term = term.to_lowercase();
        events.retain(|e| {
            e.title.to_lowercase().contains(&term)
                || e.description.to_lowercase().contains(&term)
                || e.location.to_lowercase().contains(&term)
        });
    }

    if let Some(category) = non_blank(&query.category) {
        events.retain(|e| e.category == category);
    }

    match query.sort {
        SortKey::Date => events.sort_by(|a, b| compare_dates(&a.date, &b.date)),
        SortKey::Name => events.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortKey::Spots => events.sort_by_key(|e| std::cmp::Reverse(e.available_spots())),
    }

    events
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Chronological comparison of ISO timestamps, with or without an offset.
/// Unparseable dates sort after parseable ones, then by raw text.
fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

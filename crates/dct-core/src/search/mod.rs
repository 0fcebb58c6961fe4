//! Read-side helpers for calendar, list and search views.
//!
//! Everything here is a pure function over a snapshot returned by
//! [`crate::sync::SyncManager::bookings`]; nothing mutates the collection.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::Booking;
use crate::util::contains_ignore_case;

/// Bookings on `date`, earliest start first.
pub fn bookings_on(bookings: &[Booking], date: NaiveDate) -> Vec<Booking> {
    let mut matches: Vec<Booking> = bookings
        .iter()
        .filter(|booking| booking.date == date)
        .cloned()
        .collect();
    matches.sort_by(|a, b| a.from_time.cmp(&b.from_time).then(a.to_time.cmp(&b.to_time)));
    matches
}

/// Free-text search.
///
/// User, team and remarks match case-insensitively; date (`YYYY-MM-DD`) and
/// times (`HH:MM:SS`) match as raw substrings. A blank term matches nothing.
pub fn search(bookings: &[Booking], term: &str) -> Vec<Booking> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }
    let lowered = term.to_lowercase();

    let mut matches: Vec<Booking> = bookings
        .iter()
        .filter(|booking| {
            contains_ignore_case(&booking.user, &lowered)
                || contains_ignore_case(&booking.team, &lowered)
                || contains_ignore_case(&booking.remarks, &lowered)
                || booking.date.format("%Y-%m-%d").to_string().contains(term)
                || booking.from_time.format("%H:%M:%S").to_string().contains(term)
                || booking.to_time.format("%H:%M:%S").to_string().contains(term)
        })
        .cloned()
        .collect();
    matches.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.from_time.cmp(&b.from_time))
    });
    matches
}

/// Number of bookings per day within one calendar month.
pub fn month_counts(bookings: &[Booking], year: i32, month: u32) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for booking in bookings
        .iter()
        .filter(|booking| booking.date.year() == year && booking.date.month() == month)
    {
        *counts.entry(booking.date).or_insert(0) += 1;
    }
    counts
}

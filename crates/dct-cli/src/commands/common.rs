use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use dct_core::cache::{default_cache_path, FileSlot, LocalCacheStore};
use dct_core::config::RemoteConfig;
use dct_core::connectivity::ConnectivityMonitor;
use dct_core::models::parse_wall_time;
use dct_core::remote::SupabaseBookingStore;
use dct_core::sync::{Notice, RefreshReport, SyncManager};
use dct_core::util::compact_text;
use dct_core::Booking;
use serde::Serialize;

use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub type BookingManager = SyncManager<FileSlot, SupabaseBookingStore>;

const SHORT_ID_LEN: usize = 13;

/// Everything the commands need to assemble a [`BookingManager`].
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub cache_path: PathBuf,
    pub remote: RemoteConfig,
    pub offline: bool,
}

#[derive(Debug, Serialize)]
pub struct BookingListItem {
    pub id: String,
    pub date: String,
    pub from_time: String,
    pub to_time: String,
    pub time_span: String,
    pub user: String,
    pub team: String,
    pub remarks: String,
    pub created_at: String,
}

pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

pub fn parse_time_arg(raw: &str) -> Result<NaiveTime, String> {
    parse_wall_time(raw).ok_or_else(|| format!("invalid time '{raw}', expected HH:MM"))
}

pub fn resolve_cache_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env::var_os("DCT_CACHE_PATH").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_cache_path()
        .ok_or_else(|| CliError::Config("Failed to resolve local data directory".to_string()))
}

/// Environment variables layered over the selected CLI profile.
pub fn resolve_remote_config(profile: Option<&str>) -> Result<RemoteConfig, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile);
    let base = config
        .profile(&profile_name)
        .map(|profile| profile.remote_config())
        .unwrap_or_default();
    tracing::debug!("Using CLI profile '{}'", profile_name);
    Ok(RemoteConfig::from_env().merged_over(base))
}

/// Wire cache, remote client and connectivity into a manager and load the
/// collection once.
pub async fn open_manager(
    options: &ManagerOptions,
) -> Result<(BookingManager, RefreshReport), CliError> {
    let cache = LocalCacheStore::new(FileSlot::new(options.cache_path.clone()));
    let remote = SupabaseBookingStore::new(&options.remote)?;
    let connectivity = ConnectivityMonitor::new(!options.offline);

    let manager = SyncManager::new(cache, remote, connectivity);
    let report = manager.refresh().await;
    if report.warning.is_some() {
        print_notice(&report.notice());
    }
    Ok((manager, report))
}

/// Exact id first, then a unique id prefix.
pub fn resolve_booking(query: &str, bookings: &[Booking]) -> Result<Booking, CliError> {
    let query = normalize_booking_identifier(query)?;
    if let Some(booking) = bookings.iter().find(|booking| booking.id.as_str() == query) {
        return Ok(booking.clone());
    }

    let matches = bookings
        .iter()
        .filter(|booking| booking.id.as_str().starts_with(&query))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [] => Err(CliError::BookingNotFound(query)),
        [booking] => Ok((*booking).clone()),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|booking| short_id(booking))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousBookingId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_booking_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyBookingId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn short_id(booking: &Booking) -> String {
    booking.id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_booking_lines(bookings: &[Booking]) -> Vec<String> {
    bookings
        .iter()
        .map(|booking| {
            let line = format!(
                "{:<13}  {}  {}  {} ({})",
                short_id(booking),
                booking.date.format("%Y-%m-%d"),
                booking.time_span_label(),
                booking.user,
                booking.team
            );
            let remarks = compact_text(
                &booking
                    .remarks
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            if remarks.is_empty() {
                line
            } else {
                format!("{line}  {remarks}")
            }
        })
        .collect()
}

pub fn booking_to_list_item(booking: &Booking) -> BookingListItem {
    BookingListItem {
        id: booking.id.to_string(),
        date: booking.date.format("%Y-%m-%d").to_string(),
        from_time: booking.from_time.format("%H:%M:%S").to_string(),
        to_time: booking.to_time.format("%H:%M:%S").to_string(),
        time_span: booking.time_span_label(),
        user: booking.user.clone(),
        team: booking.team.clone(),
        remarks: booking.remarks.clone(),
        created_at: booking.created_at.to_rfc3339(),
    }
}

pub fn print_bookings(bookings: &[Booking], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items = bookings
            .iter()
            .map(booking_to_list_item)
            .collect::<Vec<BookingListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_booking_lines(bookings) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Success goes to stdout; warnings and failures to stderr.
pub fn print_notice(notice: &Notice) {
    match notice {
        Notice::Success(message) => println!("{message}"),
        Notice::SyncWarning(message) | Notice::Failure(message) => {
            eprintln!("{}: {message}", notice.title());
        }
    }
}

/// Failure outcome for an error that aborted a command.
pub fn failure_notice(error: &CliError) -> Notice {
    match error {
        CliError::Core(error) => Notice::failure(error),
        other => Notice::Failure(other.to_string()),
    }
}

/// Trim free-text fields coming from flags.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_string()
}

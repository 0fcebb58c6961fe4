use dct_core::config::RemoteConfig;
use dct_core::remote::{RemoteStore, SupabaseBookingStore};

use crate::cli::RemoteCommands;
use crate::commands::common::format_booking_lines;
use crate::error::CliError;

pub async fn run_remote(command: RemoteCommands, config: &RemoteConfig) -> Result<(), CliError> {
    match command {
        RemoteCommands::Check { limit } => run_remote_check(limit, config).await,
    }
}

/// Talk to the remote store directly, bypassing the cache.
pub async fn run_remote_check(limit: usize, config: &RemoteConfig) -> Result<(), CliError> {
    if !config.is_configured() {
        return Err(CliError::RemoteNotConfigured);
    }

    let store = SupabaseBookingStore::new(config)?;
    let total = store.count().await?;
    println!(
        "Connected to {} ({total} bookings)",
        store.table_url().unwrap_or_default()
    );

    let bookings = store.list().await?;
    let sample = &bookings[..bookings.len().min(limit)];
    for line in format_booking_lines(sample) {
        println!("{line}");
    }
    Ok(())
}

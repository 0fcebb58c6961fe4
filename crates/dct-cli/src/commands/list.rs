use chrono::NaiveDate;
use dct_core::search::bookings_on;

use crate::commands::common::{open_manager, print_bookings, ManagerOptions};
use crate::error::CliError;

pub async fn run_list(
    date: Option<NaiveDate>,
    as_json: bool,
    options: &ManagerOptions,
) -> Result<(), CliError> {
    let (manager, _) = open_manager(options).await?;
    let bookings = manager.bookings().await;
    let bookings = match date {
        Some(date) => bookings_on(&bookings, date),
        None => bookings,
    };

    print_bookings(&bookings, as_json)
}

use chrono::{Datelike, NaiveDate};
use dct_core::search::month_counts;

use crate::commands::common::{open_manager, ManagerOptions};
use crate::error::CliError;

pub fn parse_month_arg(raw: &str) -> Result<(i32, u32), String> {
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{raw}', expected YYYY-MM"))?;
    Ok((first_day.year(), first_day.month()))
}

pub async fn run_calendar(month: (i32, u32), options: &ManagerOptions) -> Result<(), CliError> {
    let (year, month) = month;
    let (manager, _) = open_manager(options).await?;
    let counts = month_counts(&manager.bookings().await, year, month);

    if counts.is_empty() {
        println!("No bookings in {year:04}-{month:02}");
        return Ok(());
    }
    for (date, count) in counts {
        let noun = if count == 1 { "booking" } else { "bookings" };
        println!("{}  {count} {noun}", date.format("%Y-%m-%d"));
    }
    Ok(())
}

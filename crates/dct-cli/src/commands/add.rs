use chrono::{Local, NaiveDate, NaiveTime};
use dct_core::NewBooking;

use crate::commands::common::{normalize_field, open_manager, print_notice, ManagerOptions};
use crate::error::CliError;

/// Flag values for a new booking.
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub date: NaiveDate,
    pub from: NaiveTime,
    pub to: NaiveTime,
    pub user: String,
    pub team: String,
    pub remarks: String,
    pub allow_past: bool,
}

pub async fn run_add(args: AddArgs, options: &ManagerOptions) -> Result<(), CliError> {
    let draft = NewBooking {
        date: args.date,
        from_time: args.from,
        to_time: args.to,
        user: normalize_field(&args.user),
        team: normalize_field(&args.team),
        remarks: normalize_field(&args.remarks),
    };
    draft.validate()?;
    if !args.allow_past {
        draft.ensure_not_in_past(Local::now().naive_local())?;
    }

    let (manager, _) = open_manager(options).await?;
    let report = manager.create(draft).await?;
    print_notice(&report.notice());
    println!("{}", report.booking_id);
    Ok(())
}

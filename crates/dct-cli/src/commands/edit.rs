use chrono::{Local, NaiveDate, NaiveTime};
use dct_core::models::BookingPatch;

use crate::commands::common::{
    normalize_booking_identifier, normalize_field, open_manager, print_notice, resolve_booking,
    ManagerOptions,
};
use crate::error::CliError;

/// Flag values for an edit; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveTime>,
    pub to: Option<NaiveTime>,
    pub user: Option<String>,
    pub team: Option<String>,
    pub remarks: Option<String>,
    pub allow_past: bool,
}

impl EditArgs {
    fn patch(&self) -> BookingPatch {
        BookingPatch {
            date: self.date,
            from_time: self.from,
            to_time: self.to,
            user: self.user.as_deref().map(normalize_field),
            team: self.team.as_deref().map(normalize_field),
            remarks: self.remarks.as_deref().map(normalize_field),
        }
    }

    const fn moves_start(&self) -> bool {
        self.date.is_some() || self.from.is_some()
    }
}

pub async fn run_edit(id: &str, args: EditArgs, options: &ManagerOptions) -> Result<(), CliError> {
    let query = normalize_booking_identifier(id)?;
    let patch = args.patch();
    if patch.is_empty() {
        return Err(CliError::EmptyEdit);
    }

    let (manager, _) = open_manager(options).await?;
    let current = resolve_booking(&query, &manager.bookings().await)?;
    let edited = patch.apply_to(&current);
    edited.validate()?;
    if !args.allow_past && args.moves_start() {
        edited.ensure_not_in_past(Local::now().naive_local())?;
    }

    let report = manager.update(edited).await?;
    print_notice(&report.notice());
    println!("{}", report.booking_id);
    Ok(())
}

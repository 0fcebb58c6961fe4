use crate::commands::common::{open_manager, print_notice, resolve_booking, ManagerOptions};
use crate::error::CliError;

pub async fn run_delete(id: &str, options: &ManagerOptions) -> Result<(), CliError> {
    let (manager, _) = open_manager(options).await?;
    let booking = resolve_booking(id, &manager.bookings().await)?;

    let report = manager.delete(&booking.id).await;
    print_notice(&report.notice());
    println!("{}", report.booking_id);
    Ok(())
}

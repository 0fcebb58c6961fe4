use dct_core::search::search;

use crate::commands::common::{
    normalize_search_query, open_manager, print_bookings, ManagerOptions,
};
use crate::error::CliError;

pub async fn run_search(
    query: &str,
    as_json: bool,
    options: &ManagerOptions,
) -> Result<(), CliError> {
    let query = normalize_search_query(query)?;
    let (manager, _) = open_manager(options).await?;
    let matches = search(&manager.bookings().await, &query);

    print_bookings(&matches, as_json)
}

use std::path::Path;

use dct_core::state::SyncState;
use dct_core::sync::DataSource;

use crate::commands::common::{open_manager, print_notice, ManagerOptions};
use crate::error::CliError;

pub async fn run_refresh(options: &ManagerOptions) -> Result<(), CliError> {
    let (manager, report) = open_manager(options).await?;

    // Degraded refreshes were already reported while opening the manager.
    if report.warning.is_none() {
        print_notice(&report.notice());
    }
    println!(
        "{}",
        refresh_summary(
            report.source,
            manager.is_remote_configured(),
            manager.sync_state().await,
            manager.cache().slot().path(),
        )
    );
    Ok(())
}

pub fn refresh_summary(
    source: DataSource,
    remote_configured: bool,
    state: SyncState,
    cache_path: &Path,
) -> String {
    let source = match source {
        DataSource::Remote => "remote store",
        DataSource::LocalCache => "local cache",
    };
    let remote = if remote_configured {
        "configured"
    } else {
        "not configured"
    };
    format!(
        "Source: {source}; remote: {remote}; cache: {}; state: {}",
        cache_path.display(),
        state.label()
    )
}

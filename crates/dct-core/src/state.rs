//! Shared sync status type.

/// Outcome of the most recent remote interaction, for status indicators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Offline or remote not configured; serving the local cache.
    #[default]
    Offline,
    /// A remote call is in flight.
    Syncing,
    /// Last remote call succeeded.
    Synced,
    /// Last remote call failed.
    Error,
}

impl SyncState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

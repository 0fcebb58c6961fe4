//! Per-operation outcomes returned by the sync manager.

use crate::error::Error;
use crate::models::BookingId;

/// Where `refresh` sourced the collection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    LocalCache,
}

/// Write kinds, used in log lines and sync warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn past_tense(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Why a remote mirror was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    NotConfigured,
}

/// What happened to the remote half of a write.
#[derive(Debug)]
pub enum RemoteSync {
    Mirrored,
    Skipped(SkipReason),
    /// Holds an [`Error::SyncWarning`]; the local commit stands.
    Failed(Error),
}

impl RemoteSync {
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct RefreshReport {
    pub source: DataSource,
    pub count: usize,
    /// `RemoteUnavailable` when the remote list failed and the cache was
    /// used, `ReadFailed` when that fallback was empty as well.
    pub warning: Option<Error>,
}

impl RefreshReport {
    pub fn notice(&self) -> Notice {
        match &self.warning {
            None => Notice::Success(format!("Loaded {} bookings.", self.count)),
            Some(Error::ReadFailed) => {
                Notice::SyncWarning("Could not load any bookings; showing none.".to_string())
            }
            Some(error) => Notice::SyncWarning(format!(
                "Showing {} cached bookings; {error}",
                self.count
            )),
        }
    }
}

#[derive(Debug)]
pub struct WriteReport {
    pub operation: Operation,
    pub booking_id: BookingId,
    pub remote: RemoteSync,
}

impl WriteReport {
    pub fn notice(&self) -> Notice {
        match &self.remote {
            RemoteSync::Failed(error) => Notice::SyncWarning(format!(
                "Booking {} locally, but it could not be synced to the cloud. {error}",
                self.operation.past_tense()
            )),
            RemoteSync::Mirrored | RemoteSync::Skipped(_) => Notice::Success(format!(
                "Booking {} successfully.",
                self.operation.past_tense()
            )),
        }
    }
}

/// UI-facing conclusion of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    SyncWarning(String),
    Failure(String),
}

impl Notice {
    /// Failure notice for an operation rejected before any side effect.
    pub fn failure(error: &Error) -> Self {
        Self::Failure(error.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::SyncWarning(message) | Self::Failure(message) => {
                message
            }
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Success(_) => "Success",
            Self::SyncWarning(_) => "Sync warning",
            Self::Failure(_) => "Error",
        }
    }
}

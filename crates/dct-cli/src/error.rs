use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] dct_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Booking ID cannot be empty")]
    EmptyBookingId,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Nothing to edit; pass at least one of --date, --from, --to, --user, --team, --remarks")]
    EmptyEdit,
    #[error("Booking not found for id/prefix: {0}")]
    BookingNotFound(String),
    #[error("{0}")]
    AmbiguousBookingId(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Remote store is not configured. Run `dct config init --supabase-url <URL> --supabase-anon-key <KEY>`, or set DCT_SUPABASE_URL and DCT_SUPABASE_ANON_KEY."
    )]
    RemoteNotConfigured,
}

//! Remote store: the network-hosted, authoritative booking table.

mod supabase;

use crate::error::Result;
use crate::models::{Booking, BookingId};

pub use supabase::SupabaseBookingStore;

/// Asynchronous, fallible access to the remote bookings table keyed by `id`.
///
/// Every operation fails with [`crate::Error::RemoteUnavailable`] when the
/// store is unreachable, misconfigured or answers with a server-side error.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Static precondition check; never touches the network.
    fn is_configured(&self) -> bool;

    /// All bookings, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Booking>>;

    /// Insert a booking and return the stored representation.
    async fn create(&self, booking: &Booking) -> Result<Booking>;

    /// Overwrite the booking with the same id and return the stored representation.
    async fn update(&self, booking: &Booking) -> Result<Booking>;

    /// Delete the booking with `id`.
    async fn delete(&self, id: &BookingId) -> Result<()>;
}

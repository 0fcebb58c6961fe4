//! Booking synchronization manager.
//!
//! Owns the in-memory booking collection and keeps it in step with the local
//! cache and the remote store:
//!
//! - **Reads** (`refresh`) adopt the remote list when online and configured,
//!   mirroring it into the cache; otherwise, or when the remote call fails,
//!   they adopt the cache. Each refresh replaces the collection wholesale.
//! - **Writes** (`create`, `update`, `delete`) validate, commit to memory and
//!   cache immediately, then mirror to the remote store once. A failed mirror
//!   is reported as a sync warning and never rolled back or retried; the next
//!   successful remote refresh is what reconciles the tiers.

mod report;

use tokio::sync::{watch, Mutex};

use crate::cache::{CacheSlot, LocalCacheStore};
use crate::connectivity::ConnectivityMonitor;
use crate::error::{Error, Result};
use crate::models::{Booking, BookingId, NewBooking};
use crate::remote::RemoteStore;
use crate::state::SyncState;

pub use report::{
    DataSource, Notice, Operation, RefreshReport, RemoteSync, SkipReason, WriteReport,
};

#[derive(Debug, Default)]
struct Collection {
    bookings: Vec<Booking>,
    sync_state: SyncState,
}

/// Orchestrates the local cache and the remote store behind one collection.
///
/// The state lock guards the collection together with the cache's
/// load-mutate-save sequence and is never held across a remote call.
pub struct SyncManager<S: CacheSlot, R: RemoteStore> {
    cache: LocalCacheStore<S>,
    remote: R,
    connectivity: ConnectivityMonitor,
    collection: Mutex<Collection>,
}

impl<S: CacheSlot, R: RemoteStore> SyncManager<S, R> {
    pub fn new(cache: LocalCacheStore<S>, remote: R, connectivity: ConnectivityMonitor) -> Self {
        Self {
            cache,
            remote,
            connectivity,
            collection: Mutex::new(Collection::default()),
        }
    }

    pub const fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub const fn cache(&self) -> &LocalCacheStore<S> {
        &self.cache
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_configured()
    }

    /// Read-only snapshot of the current collection.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.collection.lock().await.bookings.clone()
    }

    pub async fn find(&self, id: &BookingId) -> Option<Booking> {
        self.collection
            .lock()
            .await
            .bookings
            .iter()
            .find(|booking| &booking.id == id)
            .cloned()
    }

    pub async fn sync_state(&self) -> SyncState {
        self.collection.lock().await.sync_state
    }

    /// Reload the collection from the remote store, or from the local cache
    /// when the remote is offline, unconfigured or failing.
    pub async fn refresh(&self) -> RefreshReport {
        let remote_error = match self.remote_gate() {
            Some(reason) => {
                tracing::debug!("Skipping remote list ({:?}); reading local cache", reason);
                None
            }
            None => {
                self.set_sync_state(SyncState::Syncing).await;
                match self.remote.list().await {
                    Ok(bookings) => return self.adopt_remote(bookings).await,
                    Err(error) => {
                        let error = as_remote_unavailable(error);
                        tracing::warn!(
                            "Failed to load bookings from remote store, falling back to local cache: {}",
                            error
                        );
                        Some(error)
                    }
                }
            }
        };

        let mut collection = self.collection.lock().await;
        let bookings = self.cache.load();
        let count = bookings.len();
        collection.bookings = bookings;
        collection.sync_state = if remote_error.is_some() {
            SyncState::Error
        } else {
            SyncState::Offline
        };
        drop(collection);

        tracing::info!("Loaded {} bookings from local cache", count);
        let warning = match remote_error {
            Some(_) if count == 0 => Some(Error::ReadFailed),
            other => other,
        };
        RefreshReport {
            source: DataSource::LocalCache,
            count,
            warning,
        }
    }

    async fn adopt_remote(&self, bookings: Vec<Booking>) -> RefreshReport {
        let count = bookings.len();
        let mut collection = self.collection.lock().await;
        self.cache.save(&bookings);
        collection.bookings = bookings;
        collection.sync_state = SyncState::Synced;
        drop(collection);

        tracing::info!("Loaded {} bookings from remote store", count);
        RefreshReport {
            source: DataSource::Remote,
            count,
            warning: None,
        }
    }

    /// Stamp and commit a new booking, then mirror it to the remote store.
    pub async fn create(&self, draft: NewBooking) -> Result<WriteReport> {
        draft.validate()?;
        let booking = draft.into_booking();
        tracing::info!("Creating booking {}", booking.id);

        {
            let mut collection = self.collection.lock().await;
            collection.bookings.push(booking.clone());
            self.cache.append(booking.clone());
        }

        let remote = match self.remote_gate() {
            Some(reason) => RemoteSync::Skipped(reason),
            None => {
                self.set_sync_state(SyncState::Syncing).await;
                let result = self.remote.create(&booking).await.map(drop);
                self.finish_mirror(Operation::Create, result).await
            }
        };

        Ok(WriteReport {
            operation: Operation::Create,
            booking_id: booking.id,
            remote,
        })
    }

    /// Replace the booking with the same id, then mirror the edit.
    ///
    /// `created_at` is kept from the committed record when one exists.
    pub async fn update(&self, mut booking: Booking) -> Result<WriteReport> {
        booking.validate()?;
        tracing::info!("Updating booking {}", booking.id);

        {
            let mut collection = self.collection.lock().await;
            if let Some(existing) = collection
                .bookings
                .iter_mut()
                .find(|existing| existing.id == booking.id)
            {
                booking.created_at = existing.created_at;
                *existing = booking.clone();
            } else {
                tracing::warn!(
                    "Booking {} is not in the local collection; mirroring update only",
                    booking.id
                );
            }
            self.cache.replace_by_id(&booking);
        }

        let remote = match self.remote_gate() {
            Some(reason) => RemoteSync::Skipped(reason),
            None => {
                self.set_sync_state(SyncState::Syncing).await;
                let result = self.remote.update(&booking).await.map(drop);
                self.finish_mirror(Operation::Update, result).await
            }
        };

        Ok(WriteReport {
            operation: Operation::Update,
            booking_id: booking.id,
            remote,
        })
    }

    /// Remove the booking from memory and cache, then from the remote store.
    pub async fn delete(&self, id: &BookingId) -> WriteReport {
        tracing::info!("Deleting booking {}", id);

        {
            let mut collection = self.collection.lock().await;
            collection.bookings.retain(|booking| &booking.id != id);
            self.cache.remove_by_id(id);
        }

        let remote = match self.remote_gate() {
            Some(reason) => RemoteSync::Skipped(reason),
            None => {
                self.set_sync_state(SyncState::Syncing).await;
                let result = self.remote.delete(id).await;
                self.finish_mirror(Operation::Delete, result).await
            }
        };

        WriteReport {
            operation: Operation::Delete,
            booking_id: id.clone(),
            remote,
        }
    }

    /// Refresh on every offline-to-online transition seen by `receiver`.
    ///
    /// Runs until the connectivity sender is dropped; hosts drive it next to
    /// their UI loop.
    pub async fn refresh_on_reconnect(&self, mut receiver: watch::Receiver<bool>) {
        while receiver.changed().await.is_ok() {
            let online = *receiver.borrow_and_update();
            if online {
                tracing::info!("Back online; refreshing bookings");
                let report = self.refresh().await;
                if let Some(warning) = report.warning {
                    tracing::warn!("Refresh after reconnect degraded: {}", warning);
                }
            }
        }
    }

    fn remote_gate(&self) -> Option<SkipReason> {
        if !self.connectivity.is_online() {
            Some(SkipReason::Offline)
        } else if !self.remote.is_configured() {
            Some(SkipReason::NotConfigured)
        } else {
            None
        }
    }

    async fn set_sync_state(&self, state: SyncState) {
        self.collection.lock().await.sync_state = state;
    }

    async fn finish_mirror(&self, operation: Operation, result: Result<()>) -> RemoteSync {
        match result {
            Ok(()) => {
                self.set_sync_state(SyncState::Synced).await;
                tracing::debug!("Remote {} succeeded", operation.as_str());
                RemoteSync::Mirrored
            }
            Err(error) => {
                self.set_sync_state(SyncState::Error).await;
                let warning = Error::SyncWarning {
                    operation: operation.as_str(),
                    reason: as_remote_unavailable(error).to_string(),
                };
                tracing::warn!("{}", warning);
                RemoteSync::Failed(warning)
            }
        }
    }
}

fn as_remote_unavailable(error: Error) -> Error {
    match error {
        Error::RemoteUnavailable(_) => error,
        other => Error::RemoteUnavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use super::*;
use crate::cache::MemorySlot;
use crate::models::parse_wall_time;

/// In-process remote table that can be switched unreachable or gated.
#[derive(Clone, Default)]
struct FakeRemote {
    rows: Arc<StdMutex<Vec<Booking>>>,
    unreachable: Arc<AtomicBool>,
    unconfigured: bool,
    calls: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
    create_gates: Arc<StdMutex<Vec<(String, Arc<Notify>)>>>,
}

impl FakeRemote {
    fn with_rows(rows: Vec<Booking>) -> Self {
        let remote = Self::default();
        *remote.rows.lock().unwrap() = rows;
        remote
    }

    fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    fn rows(&self) -> Vec<Booking> {
        self.rows.lock().unwrap().clone()
    }

    /// Hold back `create` for bookings by `user` until [`FakeRemote::release`].
    fn hold_creates_for(&self, user: &str) {
        self.create_gates
            .lock()
            .unwrap()
            .push((user.to_string(), Arc::new(Notify::new())));
    }

    fn release(&self, user: &str) {
        if let Some(gate) = self.create_gate(user) {
            gate.notify_one();
        }
    }

    fn create_gate(&self, user: &str) -> Option<Arc<Notify>> {
        self.create_gates
            .lock()
            .unwrap()
            .iter()
            .find(|(held, _)| held == user)
            .map(|(_, gate)| gate.clone())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::RemoteUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for FakeRemote {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn list(&self) -> Result<Vec<Booking>> {
        self.enter().await?;
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        self.enter().await?;
        if let Some(gate) = self.create_gate(&booking.user) {
            gate.notified().await;
        }
        self.rows.lock().unwrap().push(booking.clone());
        Ok(booking.clone())
    }

    async fn update(&self, booking: &Booking) -> Result<Booking> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        let existing = rows
            .iter_mut()
            .find(|row| row.id == booking.id)
            .ok_or_else(|| Error::RemoteUnavailable("no matching row".to_string()))?;
        *existing = booking.clone();
        Ok(booking.clone())
    }

    async fn delete(&self, id: &BookingId) -> Result<()> {
        self.enter().await?;
        self.rows.lock().unwrap().retain(|row| &row.id != id);
        Ok(())
    }
}

fn draft(user: &str, from: &str, to: &str) -> NewBooking {
    NewBooking {
        date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
        from_time: parse_wall_time(from).unwrap(),
        to_time: parse_wall_time(to).unwrap(),
        user: user.to_string(),
        team: "Lab".to_string(),
        remarks: String::new(),
    }
}

fn stored(user: &str) -> Booking {
    draft(user, "09:00", "10:00").into_booking()
}

fn manager(
    slot: &MemorySlot,
    remote: &FakeRemote,
    online: bool,
) -> SyncManager<MemorySlot, FakeRemote> {
    SyncManager::new(
        LocalCacheStore::new(slot.clone()),
        remote.clone(),
        ConnectivityMonitor::new(online),
    )
}

fn ids(bookings: &[Booking]) -> Vec<BookingId> {
    bookings.iter().map(|booking| booking.id.clone()).collect()
}

#[tokio::test]
async fn refresh_from_remote_is_idempotent_and_mirrors_cache() {
    let remote = FakeRemote::with_rows(vec![stored("A"), stored("B")]);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let first = manager.refresh().await;
    let first_bytes = serde_json::to_vec(&manager.bookings().await).unwrap();
    let second = manager.refresh().await;
    let second_bytes = serde_json::to_vec(&manager.bookings().await).unwrap();

    assert_eq!(first.source, DataSource::Remote);
    assert_eq!(second.source, DataSource::Remote);
    assert!(first.warning.is_none());
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(manager.cache().load(), manager.bookings().await);
    assert_eq!(manager.sync_state().await, SyncState::Synced);
}

#[tokio::test]
async fn refresh_replaces_rather_than_merges() {
    let remote = FakeRemote::with_rows(vec![stored("A")]);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, false);

    manager.create(draft("Local", "08:00", "09:00")).await.unwrap();
    manager.connectivity().set_online(true);
    manager.refresh().await;

    assert_eq!(ids(&manager.bookings().await), ids(&remote.rows()));
}

#[tokio::test]
async fn create_is_visible_even_when_remote_fails() {
    let remote = FakeRemote::default();
    remote.set_reachable(false);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let report = manager.create(draft("Ann", "14:00", "15:00")).await.unwrap();

    assert!(matches!(
        report.remote,
        RemoteSync::Failed(Error::SyncWarning { operation: "create", .. })
    ));
    assert!(matches!(report.notice(), Notice::SyncWarning(_)));
    let bookings = manager.bookings().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, report.booking_id);
    assert_eq!(bookings[0].user, "Ann");
    assert_eq!(manager.cache().load(), bookings);
    assert_eq!(manager.sync_state().await, SyncState::Error);
}

#[tokio::test]
async fn optimistic_commit_precedes_remote_round_trip() {
    let gate = Arc::new(Notify::new());
    let remote = FakeRemote {
        gate: Some(gate.clone()),
        ..FakeRemote::default()
    };
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let observer = async {
        loop {
            if !manager.bookings().await.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(remote.rows().is_empty());
        assert_eq!(manager.cache().load().len(), 1);
        gate.notify_one();
    };
    let (report, ()) = tokio::join!(manager.create(draft("Ann", "10:00", "11:00")), observer);

    assert!(matches!(report.unwrap().remote, RemoteSync::Mirrored));
    assert_eq!(remote.rows().len(), 1);
}

#[tokio::test]
async fn local_wins_until_remote_refresh_overwrites() {
    let remote = FakeRemote::default();
    remote.set_reachable(false);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let report = manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();
    assert!(report.remote.is_warning());

    manager.connectivity().set_online(false);
    let offline = manager.refresh().await;
    assert_eq!(offline.source, DataSource::LocalCache);
    assert_eq!(ids(&manager.bookings().await), vec![report.booking_id.clone()]);

    manager.connectivity().set_online(true);
    remote.set_reachable(true);
    let online = manager.refresh().await;
    assert_eq!(online.source, DataSource::Remote);
    assert!(manager.bookings().await.is_empty());
    assert!(manager.cache().load().is_empty());
}

#[tokio::test]
async fn refresh_falls_back_to_cache_when_remote_goes_away() {
    let a = stored("A");
    let b = stored("B");
    let remote = FakeRemote::with_rows(vec![a, b]);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    manager.refresh().await;
    let mirrored = manager.bookings().await;

    remote.set_reachable(false);
    let report = manager.refresh().await;

    assert_eq!(report.source, DataSource::LocalCache);
    assert_eq!(report.count, 2);
    assert!(matches!(report.warning, Some(Error::RemoteUnavailable(_))));
    assert_eq!(manager.bookings().await, mirrored);
}

#[tokio::test]
async fn remote_failure_with_empty_cache_is_read_failed() {
    let remote = FakeRemote::default();
    remote.set_reachable(false);
    let slot = MemorySlot::with_payload("{ corrupt");
    let manager = manager(&slot, &remote, true);

    let report = manager.refresh().await;

    assert!(matches!(report.warning, Some(Error::ReadFailed)));
    assert!(manager.bookings().await.is_empty());
}

#[tokio::test]
async fn validation_rejects_before_touching_stores() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    for (from, to) in [("14:00", "14:00"), ("14:00", "13:00")] {
        let result = manager.create(draft("Ann", from, to)).await;
        assert!(matches!(result, Err(Error::ValidationFailed(_))));
    }

    let mut invalid = stored("Bo");
    invalid.to_time = invalid.from_time;
    assert!(matches!(
        manager.update(invalid).await,
        Err(Error::ValidationFailed(_))
    ));

    assert!(manager.bookings().await.is_empty());
    assert_eq!(slot.payload(), None);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn update_replaces_in_place_and_keeps_created_at() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let report = manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();
    let original = manager.find(&report.booking_id).await.unwrap();

    let mut edited = original.clone();
    edited.remarks = "projector".to_string();
    edited.created_at = chrono::Utc::now() + chrono::Duration::days(1);
    let report = manager.update(edited).await.unwrap();

    assert!(matches!(report.remote, RemoteSync::Mirrored));
    let current = manager.find(&original.id).await.unwrap();
    assert_eq!(current.remarks, "projector");
    assert_eq!(current.created_at, original.created_at);
    assert_eq!(manager.cache().load(), vec![current.clone()]);
    assert_eq!(remote.rows(), vec![current]);
}

#[tokio::test]
async fn delete_removes_from_every_tier() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let keep = manager.create(draft("Keep", "08:00", "09:00")).await.unwrap();
    let gone = manager.create(draft("Gone", "10:00", "11:00")).await.unwrap();

    let report = manager.delete(&gone.booking_id).await;
    assert!(matches!(report.remote, RemoteSync::Mirrored));

    assert_eq!(ids(&manager.bookings().await), vec![keep.booking_id.clone()]);
    assert_eq!(ids(&manager.cache().load()), vec![keep.booking_id.clone()]);

    manager.refresh().await;
    assert_eq!(ids(&manager.bookings().await), vec![keep.booking_id]);
}

#[tokio::test]
async fn writes_apply_in_issue_order() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, false);

    let first = manager.create(draft("One", "08:00", "09:00")).await.unwrap();
    let second = manager.create(draft("Two", "09:00", "10:00")).await.unwrap();
    let third = manager.create(draft("Three", "10:00", "11:00")).await.unwrap();

    let expected = vec![first.booking_id, second.booking_id, third.booking_id];
    assert_eq!(ids(&manager.bookings().await), expected);
    assert_eq!(ids(&manager.cache().load()), expected);
}

#[tokio::test]
async fn concurrent_writes_commit_in_issue_order_and_mirror_in_completion_order() {
    let remote = FakeRemote::default();
    for user in ["One", "Two", "Three"] {
        remote.hold_creates_for(user);
    }
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let driver = async {
        while manager.bookings().await.len() < 3 {
            tokio::task::yield_now().await;
        }
        assert!(remote.rows().is_empty());
        for (user, mirrored) in [("Three", 1), ("Two", 2), ("One", 3)] {
            remote.release(user);
            while remote.rows().len() < mirrored {
                tokio::task::yield_now().await;
            }
        }
    };
    let (first, second, third, ()) = tokio::join!(
        manager.create(draft("One", "08:00", "09:00")),
        manager.create(draft("Two", "09:00", "10:00")),
        manager.create(draft("Three", "10:00", "11:00")),
        driver
    );

    let reports = [first.unwrap(), second.unwrap(), third.unwrap()];
    assert!(reports
        .iter()
        .all(|report| matches!(report.remote, RemoteSync::Mirrored)));
    let issued = reports
        .iter()
        .map(|report| report.booking_id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids(&manager.bookings().await), issued);
    assert_eq!(ids(&manager.cache().load()), issued);

    let mirrored = remote
        .rows()
        .into_iter()
        .map(|row| row.user)
        .collect::<Vec<_>>();
    assert_eq!(mirrored, vec!["Three", "Two", "One"]);
}

#[tokio::test]
async fn unconfigured_remote_is_skipped() {
    let remote = FakeRemote {
        unconfigured: true,
        ..FakeRemote::default()
    };
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, true);

    let report = manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();
    assert!(matches!(
        report.remote,
        RemoteSync::Skipped(SkipReason::NotConfigured)
    ));
    assert_eq!(report.notice().title(), "Success");

    let refresh = manager.refresh().await;
    assert_eq!(refresh.source, DataSource::LocalCache);
    assert!(refresh.warning.is_none());
    assert_eq!(remote.calls(), 0);
    assert_eq!(manager.sync_state().await, SyncState::Offline);
}

#[tokio::test]
async fn offline_writes_skip_remote() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, false);

    let report = manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();
    assert!(matches!(
        report.remote,
        RemoteSync::Skipped(SkipReason::Offline)
    ));
    let report = manager.delete(&report.booking_id).await;
    assert!(matches!(
        report.remote,
        RemoteSync::Skipped(SkipReason::Offline)
    ));
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn corrupt_cache_degrades_to_empty_offline() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::with_payload("{\"not\": \"an array\"}");
    let manager = manager(&slot, &remote, false);

    let report = manager.refresh().await;
    assert_eq!(report.count, 0);
    assert!(report.warning.is_none());

    manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();
    assert_eq!(manager.cache().load().len(), 1);
}

#[tokio::test]
async fn cache_write_failure_keeps_memory_authoritative() {
    let remote = FakeRemote::default();
    let slot = MemorySlot::default();
    slot.reject_writes(true);
    let manager = manager(&slot, &remote, false);

    manager.create(draft("Ann", "10:00", "11:00")).await.unwrap();

    assert_eq!(manager.bookings().await.len(), 1);
    assert!(manager.cache().load().is_empty());
}

#[tokio::test]
async fn reconnect_triggers_refresh() {
    let remote = FakeRemote::with_rows(vec![stored("Remote")]);
    let slot = MemorySlot::default();
    let manager = manager(&slot, &remote, false);
    manager.refresh().await;
    assert!(manager.bookings().await.is_empty());

    let receiver = manager.connectivity().subscribe();
    let driver = async {
        manager.connectivity().set_online(true);
        for _ in 0..50 {
            if !manager.bookings().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };

    tokio::select! {
        () = manager.refresh_on_reconnect(receiver) => {}
        () = driver => {}
    }

    assert_eq!(ids(&manager.bookings().await), ids(&remote.rows()));
}

//! Local cache store: the client-durable, non-authoritative booking tier.
//!
//! The cache is a single named slot holding a JSON array of bookings. It is
//! always readable: an absent, unreadable or malformed slot loads as an empty
//! list, and a rejected write is logged and otherwise ignored.

mod slot;

use crate::error::Result;
use crate::models::{Booking, BookingId};

pub use slot::{default_cache_path, CacheSlot, FileSlot, MemorySlot, CACHE_SLOT_NAME};

/// Load/save wrapper around a [`CacheSlot`].
///
/// `append`, `replace_by_id` and `remove_by_id` are load-mutate-save
/// sequences and are not atomic on their own; callers sharing a store across
/// tasks serialize them (the sync manager holds its state lock around them).
#[derive(Debug, Clone)]
pub struct LocalCacheStore<S: CacheSlot> {
    slot: S,
}

impl<S: CacheSlot> LocalCacheStore<S> {
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// All cached bookings, or empty when the slot is absent or invalid.
    pub fn load(&self) -> Vec<Booking> {
        match self.try_load() {
            Ok(bookings) => bookings,
            Err(error) => {
                tracing::warn!(
                    "Discarding local booking cache at {}: {}",
                    self.slot.describe(),
                    error
                );
                Vec::new()
            }
        }
    }

    /// Strict variant of [`LocalCacheStore::load`] that reports why a slot
    /// was rejected. An absent slot is not an error.
    pub fn try_load(&self) -> Result<Vec<Booking>> {
        let Some(raw) = self.slot.read()? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str::<Vec<Booking>>(&raw)?)
    }

    /// Overwrite the slot. Failures are logged; in-memory state stays
    /// authoritative for the session.
    pub fn save(&self, bookings: &[Booking]) {
        if let Err(error) = self.try_save(bookings) {
            tracing::warn!(
                "Failed to save {} bookings to local cache at {}: {}",
                bookings.len(),
                self.slot.describe(),
                error
            );
        }
    }

    fn try_save(&self, bookings: &[Booking]) -> Result<()> {
        let payload = serde_json::to_string(bookings)?;
        self.slot.write(&payload)
    }

    pub fn append(&self, booking: Booking) {
        let mut bookings = self.load();
        bookings.push(booking);
        self.save(&bookings);
    }

    /// Replace the record with the same id. Returns `false` (and writes
    /// nothing) when no such record is cached.
    pub fn replace_by_id(&self, booking: &Booking) -> bool {
        let mut bookings = self.load();
        let Some(existing) = bookings.iter_mut().find(|b| b.id == booking.id) else {
            return false;
        };
        *existing = booking.clone();
        self.save(&bookings);
        true
    }

    /// Remove every record with `id`. Returns whether anything was removed.
    pub fn remove_by_id(&self, id: &BookingId) -> bool {
        let mut bookings = self.load();
        let before = bookings.len();
        bookings.retain(|b| &b.id != id);
        let removed = bookings.len() != before;
        self.save(&bookings);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_wall_time, NewBooking};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn booking(user: &str) -> Booking {
        NewBooking {
            date: NaiveDate::from_ymd_opt(2030, 1, 2).unwrap(),
            from_time: parse_wall_time("10:00").unwrap(),
            to_time: parse_wall_time("11:00").unwrap(),
            user: user.to_string(),
            team: "QA".to_string(),
            remarks: String::new(),
        }
        .into_booking()
    }

    #[test]
    fn absent_slot_loads_empty() {
        let store = LocalCacheStore::new(MemorySlot::default());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_payloads_load_empty() {
        for raw in [
            "not json",
            "{\"id\": \"x\"}",
            "42",
            "[1, 2, 3]",
            "[{\"user\": \"no id\"}]",
            "[{\"id\": \"\", \"date\": \"2030-01-02\", \"from_time\": \"10:00\", \"to_time\": \"11:00\", \"user\": \"a\", \"team\": \"b\", \"created_at\": \"2030-01-01T00:00:00Z\"}]",
        ] {
            let store = LocalCacheStore::new(MemorySlot::with_payload(raw));
            assert!(store.load().is_empty(), "payload {raw} should be discarded");
            assert!(store.try_load().is_err());
        }
    }

    #[test]
    fn one_bad_entry_discards_the_whole_slot() {
        let good = serde_json::to_value(booking("Ann")).unwrap();
        let raw = serde_json::json!([good, {"id": "partial"}]).to_string();
        let store = LocalCacheStore::new(MemorySlot::with_payload(&raw));
        assert!(store.load().is_empty());
    }

    #[test]
    fn null_remarks_entry_keeps_the_slot() {
        let mut row = serde_json::to_value(booking("Ann")).unwrap();
        row["remarks"] = serde_json::Value::Null;
        let raw = serde_json::json!([row]).to_string();
        let store = LocalCacheStore::new(MemorySlot::with_payload(&raw));

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].user, "Ann");
        assert!(loaded[0].remarks.is_empty());
    }

    #[test]
    fn append_replace_remove() {
        let store = LocalCacheStore::new(MemorySlot::default());
        let first = booking("Ann");
        let second = booking("Bo");
        store.append(first.clone());
        store.append(second.clone());
        assert_eq!(store.load(), vec![first.clone(), second.clone()]);

        let mut edited = first.clone();
        edited.remarks = "moved".to_string();
        assert!(store.replace_by_id(&edited));
        assert_eq!(store.load()[0].remarks, "moved");

        let stranger = booking("Cy");
        assert!(!store.replace_by_id(&stranger));
        assert_eq!(store.load().len(), 2);

        assert!(store.remove_by_id(&first.id));
        assert!(!store.remove_by_id(&first.id));
        assert_eq!(store.load(), vec![second]);
    }

    #[test]
    fn rejected_write_is_swallowed() {
        let slot = MemorySlot::default();
        let store = LocalCacheStore::new(slot.clone());
        store.save(&[booking("Ann")]);
        slot.reject_writes(true);
        store.save(&[]);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn file_slot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CACHE_SLOT_NAME);
        let store = LocalCacheStore::new(FileSlot::new(&path));
        assert!(store.load().is_empty());

        let saved = vec![booking("Ann"), booking("Bo")];
        store.save(&saved);
        assert!(path.exists());
        assert_eq!(store.load(), saved);

        std::fs::write(&path, "{broken").unwrap();
        assert!(store.load().is_empty());
    }
}

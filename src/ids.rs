use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out strictly increasing campaign ids for the life of the process.
///
/// Ids start at the current wall-clock time in milliseconds so they keep the
/// shape of ids written by earlier sessions, but are never reused even when
/// two campaigns are created within the same millisecond.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Seed past both the clock and every id already in use.
    pub fn seeded(existing: impl IntoIterator<Item = u64>) -> Self {
        let clock = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let after_existing = existing
            .into_iter()
            .max()
            .map_or(0, |max| max.saturating_add(1));
        Self::starting_at(clock.max(after_existing))
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Make sure future ids land after `id`.
    pub fn observe(&self, id: u64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::seeded(std::iter::empty())
    }
}

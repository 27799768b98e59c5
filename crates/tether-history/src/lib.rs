//! Tether History - Fixed-capacity snapshot buffer with interpolating queries
//!
//! Every tick a physical object records its pose here. Renderers and other
//! time-based consumers then ask for the pose at an arbitrary timestamp and
//! get back an interpolated snapshot, or the nearest boundary snapshot when
//! the timestamp falls outside what has been recorded.
//!
//! # Features
//!
//! - **Bounded memory**: fixed-size ring buffer allocated once
//! - **O(1) insertion**: the oldest snapshot is overwritten when full
//! - **Clamped extrapolation**: out-of-range queries never fail
//!
//! # Example
//!
//! ```rust
//! use tether_core::{NullSink, Quat, Vec3};
//! use tether_history::SnapshotHistory;
//!
//! let mut history = SnapshotHistory::new();
//! history.record(0.0, Vec3::ZERO, Quat::IDENTITY);
//! history.record(1.0, Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);
//!
//! let snap = history.query(0.5, &NullSink).snapshot().unwrap();
//! assert_eq!(snap.position(), Vec3::new(1.0, 0.0, 0.0));
//! ```

use tether_core::{Diagnostic, DiagnosticSink, Quat, Snapshot, Vec3, DEFAULT_HISTORY_CAPACITY};

/// Outcome of a history query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryResult {
    /// Nothing recorded yet; the caller substitutes its live state
    Empty,
    /// Time fell inside the recorded range
    Interpolated(Snapshot),
    /// Time at or before the earliest snapshot, which is returned as-is
    BeforeHistory(Snapshot),
    /// Time after the latest snapshot, which is returned as-is
    AfterHistory(Snapshot),
    /// Query time was NaN or history ordering was corrupted; best
    /// available snapshot
    Degraded(Snapshot),
}

impl QueryResult {
    /// The resulting snapshot, if the history was not empty
    pub fn snapshot(&self) -> Option<Snapshot> {
        match *self {
            QueryResult::Empty => None,
            QueryResult::Interpolated(s)
            | QueryResult::BeforeHistory(s)
            | QueryResult::AfterHistory(s)
            | QueryResult::Degraded(s) => Some(s),
        }
    }

    /// The resulting snapshot, or `fallback` for an empty history
    pub fn unwrap_or(&self, fallback: Snapshot) -> Snapshot {
        self.snapshot().unwrap_or(fallback)
    }

    /// Whether the query time was outside the recorded range
    pub fn is_clamped(&self) -> bool {
        matches!(
            self,
            QueryResult::BeforeHistory(_) | QueryResult::AfterHistory(_)
        )
    }
}

/// A ring buffer of recent snapshots in ascending time order
///
/// Slots are allocated up front. `head` is the slot of the oldest snapshot;
/// logical index `i` lives at `(head + i) % capacity`.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    slots: Vec<Option<Snapshot>>,
    /// Slot holding the oldest snapshot
    head: usize,
    /// Number of snapshots currently stored
    len: usize,
}

impl SnapshotHistory {
    /// Create a history with the default capacity of 10 snapshots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history holding at most `capacity` snapshots
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
        }
    }

    fn slot(&self, index: usize) -> usize {
        (self.head + index) % self.slots.len()
    }

    /// Snapshot at logical index `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        if index >= self.len {
            return None;
        }
        self.slots[self.slot(index)].as_ref()
    }

    /// Record a snapshot, evicting the oldest one when full
    ///
    /// Times are expected to be non-decreasing. Out-of-order input is not
    /// rejected, but queries over it are undefined.
    pub fn record(&mut self, time: f64, position: Vec3, orientation: Quat) {
        self.push(Snapshot::new(time, position, orientation));
    }

    /// Record an already-built snapshot
    pub fn push(&mut self, snapshot: Snapshot) {
        let capacity = self.slots.len();
        if self.len == capacity {
            // Overwrite the oldest and move head past it
            self.slots[self.head] = Some(snapshot);
            self.head = (self.head + 1) % capacity;
        } else {
            let tail = self.slot(self.len);
            self.slots[tail] = Some(snapshot);
            self.len += 1;
        }
    }

    /// Pose at `time`
    ///
    /// - empty history: [`QueryResult::Empty`]
    /// - NaN `time`: latest snapshot as [`QueryResult::Degraded`], reports
    ///   `QueryTimeNotANumber`
    /// - `time <= earliest`: earliest snapshot, reports `QueryBeforeHistory`
    /// - `time > latest`: latest snapshot, reports `QueryAfterHistory`
    /// - otherwise the bracketing pair `a.time < time <= b.time` is blended
    ///   linearly (position) and spherically (orientation). A time equal to
    ///   `b.time` returns `b` unchanged.
    pub fn query(&self, time: f64, sink: &dyn DiagnosticSink) -> QueryResult {
        let (earliest, latest) = match (self.earliest(), self.latest()) {
            (Some(e), Some(l)) => (*e, *l),
            _ => return QueryResult::Empty,
        };

        // NaN fails every comparison below; it is the caller's error, not the buffer's
        if time.is_nan() {
            sink.report(&Diagnostic::QueryTimeNotANumber {
                latest: latest.time(),
            });
            return QueryResult::Degraded(latest);
        }

        if time <= earliest.time() {
            sink.report(&Diagnostic::QueryBeforeHistory {
                time,
                earliest: earliest.time(),
            });
            return QueryResult::BeforeHistory(earliest);
        }

        if time > latest.time() {
            sink.report(&Diagnostic::QueryAfterHistory {
                time,
                latest: latest.time(),
            });
            return QueryResult::AfterHistory(latest);
        }

        for i in 0..self.len - 1 {
            let (Some(before), Some(after)) = (self.get(i), self.get(i + 1)) else {
                break;
            };
            if before.time() < time && time <= after.time() {
                if time == after.time() {
                    return QueryResult::Interpolated(*after);
                }
                let percent = (time - before.time()) / (after.time() - before.time());
                return QueryResult::Interpolated(before.interpolate(after, time, percent as f32));
            }
        }

        // earliest < time <= latest guarantees a bracket for ordered times
        tracing::error!(time, len = self.len, "no bracketing snapshots for in-range query");
        sink.report(&Diagnostic::HistoryOrderViolated {
            time,
            len: self.len,
        });
        debug_assert!(
            false,
            "snapshot history ordering violated: no bracket for time {time}"
        );
        QueryResult::Degraded(latest)
    }

    /// Oldest stored snapshot
    pub fn earliest(&self) -> Option<&Snapshot> {
        self.get(0)
    }

    /// Newest stored snapshot
    pub fn latest(&self) -> Option<&Snapshot> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Times of the oldest and newest snapshots
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.earliest()?.time(), self.latest()?.time()))
    }

    /// Iterate snapshots from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drop all snapshots, keeping the allocation
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Get statistics about the buffer
    pub fn stats(&self) -> HistoryStats {
        let (earliest_time, latest_time) = self.time_range().unwrap_or((0.0, 0.0));
        HistoryStats {
            capacity: self.capacity(),
            len: self.len,
            earliest_time,
            latest_time,
        }
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the snapshot history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub capacity: usize,
    pub len: usize,
    /// Time of the oldest snapshot (0 when empty)
    pub earliest_time: f64,
    /// Time of the newest snapshot (0 when empty)
    pub latest_time: f64,
}

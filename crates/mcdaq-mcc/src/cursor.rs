//! Scan cursor tracking and wrap detection.
//!
//! The hardware fills its circular buffer at its own pace; the engine
//! only sees periodic snapshots of the write cursor. [`ScanCursor`]
//! turns consecutive snapshots into the range of newly-valid slot
//! positions, splitting the range in two when the cursor wrapped.

use mcdaq_core::{ScanSnapshot, ScanStatus};
use std::ops::Range;

/// Outcome of feeding one status snapshot to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorAdvance {
    /// Nothing new to process this cycle.
    NoChange,
    /// New slots became valid since the previous snapshot.
    Advanced(AdvanceRange),
}

/// Newly-valid slot positions, in processing order.
///
/// When the cursor wrapped, `tail` holds `[last, capacity)` and `head`
/// holds `[0, current)`; the tail must be walked first to preserve
/// sample order. Without a wrap `tail` is `None` and `head` is
/// `[last, current)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceRange {
    pub tail: Option<Range<usize>>,
    pub head: Range<usize>,
}

impl AdvanceRange {
    /// Slot indices in consumption order (wrap tail before head).
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.tail.clone().into_iter().flatten().chain(self.head.clone())
    }

    /// Total number of newly-valid slots.
    pub fn len(&self) -> usize {
        self.tail.as_ref().map_or(0, |t| t.len()) + self.head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer-side view of the hardware write cursor.
#[derive(Debug)]
pub struct ScanCursor {
    capacity: usize,
    current_index: u32,
    current_count: u32,
    last_index: u32,
    last_sample_count: u32,
    wrap_count: u64,
    status: ScanStatus,
}

impl ScanCursor {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            current_index: 0,
            current_count: 0,
            last_index: 0,
            last_sample_count: 0,
            wrap_count: 0,
            status: ScanStatus::Idle,
        }
    }

    /// Zero all position state, e.g. at acquisition (re)start.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.current_count = 0;
        self.last_index = 0;
        self.last_sample_count = 0;
        self.wrap_count = 0;
    }

    /// Last status observed from the hardware.
    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ScanStatus) {
        self.status = status;
    }

    /// Times the write cursor has been observed to wrap since reset.
    pub fn wrap_count(&self) -> u64 {
        self.wrap_count
    }

    /// Total sample count reported by the most recent advance.
    pub fn last_sample_count(&self) -> u32 {
        self.last_sample_count
    }

    /// Fold a fresh status snapshot into the cursor state.
    ///
    /// Returns `NoChange` when the scan is not running, the hardware
    /// has produced nothing yet (count or index still zero), or the
    /// cursor did not move. Otherwise returns the newly-valid slot
    /// range; a backward cursor move means the buffer wrapped, which
    /// increments the wrap count exactly once per detection.
    pub fn advance(&mut self, snapshot: &ScanSnapshot) -> CursorAdvance {
        self.status = snapshot.status;
        if !snapshot.status.is_running() {
            return CursorAdvance::NoChange;
        }
        if snapshot.current_count == 0 || snapshot.current_index == 0 {
            return CursorAdvance::NoChange;
        }

        let current = snapshot.current_index as usize;
        let last = self.last_index as usize;
        debug_assert!(current < self.capacity);

        self.current_index = snapshot.current_index;
        self.current_count = snapshot.current_count;
        if last == current {
            return CursorAdvance::NoChange;
        }

        self.last_index = snapshot.current_index;
        self.last_sample_count = snapshot.current_count;

        if last > current {
            self.wrap_count += 1;
            CursorAdvance::Advanced(AdvanceRange {
                tail: Some(last..self.capacity),
                head: 0..current,
            })
        } else {
            CursorAdvance::Advanced(AdvanceRange {
                tail: None,
                head: last..current,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(count: u32, index: u32) -> ScanSnapshot {
        ScanSnapshot {
            status: ScanStatus::Running,
            current_count: count,
            current_index: index,
        }
    }

    #[test]
    fn no_change_before_first_sample() {
        let mut cursor = ScanCursor::new(16);
        assert_eq!(cursor.advance(&running(0, 0)), CursorAdvance::NoChange);
        assert_eq!(cursor.advance(&running(5, 0)), CursorAdvance::NoChange);
        assert_eq!(cursor.advance(&running(0, 5)), CursorAdvance::NoChange);
    }

    #[test]
    fn no_change_when_not_running() {
        let mut cursor = ScanCursor::new(16);
        let snapshot = ScanSnapshot {
            status: ScanStatus::Idle,
            current_count: 8,
            current_index: 8,
        };
        assert_eq!(cursor.advance(&snapshot), CursorAdvance::NoChange);
        assert_eq!(cursor.status(), ScanStatus::Idle);
    }

    #[test]
    fn forward_advance_yields_single_range() {
        let mut cursor = ScanCursor::new(16);
        match cursor.advance(&running(8, 8)) {
            CursorAdvance::Advanced(range) => {
                assert_eq!(range.tail, None);
                assert_eq!(range.head, 0..8);
                assert_eq!(range.slots().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
            }
            other => panic!("expected advance, got {:?}", other),
        }
        assert_eq!(cursor.wrap_count(), 0);
    }

    #[test]
    fn stationary_cursor_is_no_change() {
        let mut cursor = ScanCursor::new(16);
        cursor.advance(&running(8, 8));
        assert_eq!(cursor.advance(&running(8, 8)), CursorAdvance::NoChange);
    }

    #[test]
    fn wrap_splits_range_and_counts_once() {
        // Cursor sequence [10, 25, 5, 18] over a capacity-32 buffer:
        // one wrap between the second and third poll.
        let mut cursor = ScanCursor::new(32);
        cursor.advance(&running(10, 10));
        cursor.advance(&running(25, 25));

        match cursor.advance(&running(37, 5)) {
            CursorAdvance::Advanced(range) => {
                assert_eq!(range.tail, Some(25..32));
                assert_eq!(range.head, 0..5);
                let slots: Vec<usize> = range.slots().collect();
                assert_eq!(slots, vec![25, 26, 27, 28, 29, 30, 31, 0, 1, 2, 3, 4]);
                assert_eq!(range.len(), 12);
            }
            other => panic!("expected advance, got {:?}", other),
        }
        assert_eq!(cursor.wrap_count(), 1);

        cursor.advance(&running(50, 18));
        assert_eq!(cursor.wrap_count(), 1);
    }

    #[test]
    fn reset_clears_positions_and_wraps() {
        let mut cursor = ScanCursor::new(16);
        cursor.advance(&running(20, 12));
        cursor.advance(&running(28, 4));
        assert_eq!(cursor.wrap_count(), 1);

        cursor.reset();
        assert_eq!(cursor.wrap_count(), 0);
        match cursor.advance(&running(6, 6)) {
            CursorAdvance::Advanced(range) => assert_eq!(range.head, 0..6),
            other => panic!("expected advance, got {:?}", other),
        }
    }
}

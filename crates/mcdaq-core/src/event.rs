//! Reconstructed acquisition events and the event-id source.

use std::sync::atomic::{AtomicU64, Ordering};

/// Number of analog channels sampled per round-robin group.
///
/// The hardware scan always covers one full group per logical sample,
/// regardless of the monitored subset.
pub const READ_CHANNELS_PER_GROUP: usize = 8;

/// One reconstructed multi-channel sample group from a continuous scan.
///
/// Produced from exactly one contiguous run of `READ_CHANNELS_PER_GROUP`
/// buffer slots sharing the same sequence index. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChannelEvent {
    /// Board id of the originating device.
    pub device_id: u32,
    /// Process-wide monotonic event id.
    pub event_id: u64,
    /// Logical multi-channel sample number since acquisition start.
    pub sequence_index: u64,
    /// Wall-clock time at which the producing poll observed the data.
    pub logged_time: f64,
    /// Sample time derived from the sequence index and the start epoch.
    pub hub_time: f64,
    /// Timing uncertainty of the start epoch (post - pre).
    pub confidence_interval: f64,
    /// `logged_time - hub_time`.
    pub delay: f64,
    /// Raw values for the full channel group, in physical channel order.
    pub values: [f64; READ_CHANNELS_PER_GROUP],
}

/// One single-channel reading from sequential (per-channel) polling.
///
/// Emitted only on value change or first read of the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleChannelEvent {
    pub device_id: u32,
    pub event_id: u64,
    /// Logical channel name (`AI_0`, ...).
    pub channel_name: String,
    pub logged_time: f64,
    /// `logged_time - delay`: the estimated moment of conversion.
    pub hub_time: f64,
    /// Interval since the previous read of this channel (0.0 on first).
    pub confidence_interval: f64,
    /// Duration of the blocking driver read that produced the value.
    pub delay: f64,
    pub float_value: f64,
    pub int_value: i64,
}

/// Any event the engine can hand to a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum DaqEvent {
    MultiChannel(MultiChannelEvent),
    SingleChannel(SingleChannelEvent),
}

impl DaqEvent {
    /// Monotonic event id, whichever the variant.
    pub fn event_id(&self) -> u64 {
        match self {
            DaqEvent::MultiChannel(e) => e.event_id,
            DaqEvent::SingleChannel(e) => e.event_id,
        }
    }
}

/// Process-wide unique event id source.
pub trait EventIdSource: Send + Sync {
    /// Next id. Must be strictly increasing per source.
    fn next_id(&self) -> u64;
}

/// Atomic counter id source, starting at 1.
#[derive(Debug)]
pub struct AtomicEventIds {
    next: AtomicU64,
}

impl AtomicEventIds {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for AtomicEventIds {
    fn default() -> Self {
        Self::new()
    }
}

impl EventIdSource for AtomicEventIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_ids_are_strictly_increasing() {
        let ids = AtomicEventIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(a, 1);
    }
}

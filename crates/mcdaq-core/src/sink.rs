//! Downstream event delivery gate and channel.

use crate::event::DaqEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::trace;

/// Destination for reconstructed events.
///
/// The engine consults [`EventSink::enabled`] before handing an event
/// over; internal bookkeeping (slot counters, caches) advances either
/// way so buffer state stays consistent while reporting is paused.
pub trait EventSink: Send + Sync {
    /// Whether event reporting is currently enabled.
    fn enabled(&self) -> bool;

    /// Deliver one event. Must not block the poll path.
    fn publish(&self, event: DaqEvent);
}

/// Default sink capacity, matching the outer framework's per-device
/// event buffer length.
pub const DEFAULT_SINK_CAPACITY: usize = 1024;

/// Bounded in-memory sink that drops the oldest event on overflow.
#[derive(Debug)]
pub struct BufferedSink {
    enabled: AtomicBool,
    capacity: usize,
    events: Mutex<VecDeque<DaqEvent>>,
    drops: AtomicU64,
}

impl BufferedSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            drops: AtomicU64::new(0),
        }
    }

    /// Enable or disable reporting without touching buffered events.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Events dropped because the buffer was full.
    pub fn drop_count(&self) -> u64 {
        self.drops.load(Ordering::SeqCst)
    }

    /// Take all buffered events, oldest first.
    pub fn drain(&self) -> Vec<DaqEvent> {
        self.events.lock().drain(..).collect()
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::new(DEFAULT_SINK_CAPACITY)
    }
}

impl EventSink for BufferedSink {
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn publish(&self, event: DaqEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
            self.drops.fetch_add(1, Ordering::SeqCst);
            trace!("Dropped oldest event (sink full)");
        }
        events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MultiChannelEvent, READ_CHANNELS_PER_GROUP};

    fn event(id: u64) -> DaqEvent {
        DaqEvent::MultiChannel(MultiChannelEvent {
            device_id: 0,
            event_id: id,
            sequence_index: id,
            logged_time: 0.0,
            hub_time: 0.0,
            confidence_interval: 0.0,
            delay: 0.0,
            values: [0.0; READ_CHANNELS_PER_GROUP],
        })
    }

    #[test]
    fn buffered_sink_drops_oldest_on_overflow() {
        let sink = BufferedSink::new(2);
        sink.publish(event(1));
        sink.publish(event(2));
        sink.publish(event(3));

        assert_eq!(sink.drop_count(), 1);
        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].event_id(), 2);
        assert_eq!(drained[1].event_id(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn enable_flag_round_trips() {
        let sink = BufferedSink::default();
        assert!(sink.enabled());
        sink.set_enabled(false);
        assert!(!sink.enabled());
    }
}

//! Per-channel sequential polling with change detection.
//!
//! Each poll cycle reads every configured channel with one blocking
//! driver call apiece. This is inherently slower than the background
//! scan (roughly one time-unit per channel) and exists as a documented
//! latency trade-off, not a bug. A reading identical to the channel's
//! previous value is debounced: the cache timestamp updates, no event
//! is emitted.

use crate::config::ScanPlan;
use crate::error::Result;
use mcdaq_core::{
    Channel, Clock, DaqBoard, DaqEvent, EventIdSource, EventSink, Gain, SingleChannelEvent,
};
use tracing::{trace, warn};

/// Cached outcome of the most recent read of one channel.
#[derive(Debug, Clone, Copy, Default)]
struct ChannelReading {
    /// Start time of the last successful read; `None` until the first.
    last_time: Option<f64>,
    last_value: f64,
}

/// Poll-cycle orchestrator for per-channel sequential mode.
#[derive(Debug)]
pub struct SequentialPoller {
    device_id: u32,
    gain: Gain,
    channels: Vec<Channel>,
    cache: Vec<ChannelReading>,
}

impl SequentialPoller {
    pub fn new(plan: &ScanPlan) -> Self {
        let cache = vec![ChannelReading::default(); plan.channels.len()];
        Self {
            device_id: plan.board_id,
            gain: plan.gain,
            channels: plan.channels.clone(),
            cache,
        }
    }

    /// Forget all cached readings, e.g. at acquisition (re)start.
    pub fn reset(&mut self) {
        self.cache.fill(ChannelReading::default());
    }

    /// Run one poll cycle. Returns the number of events emitted.
    ///
    /// A failed channel read is logged and skipped for the cycle; it
    /// does not abort polling of the remaining channels.
    pub fn poll(
        &mut self,
        board: &mut dyn DaqBoard,
        clock: &dyn Clock,
        sink: &dyn EventSink,
        ids: &dyn EventIdSource,
    ) -> Result<usize> {
        let mut emitted = 0;

        for (channel, reading) in self.channels.iter().zip(self.cache.iter_mut()) {
            let read_start = clock.now();
            let value = match board.read_channel(channel.index(), self.gain) {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        channel = channel.name(),
                        error = %err,
                        "Channel read failed; skipping for this cycle"
                    );
                    continue;
                }
            };
            let read_end = clock.now();

            let changed = reading.last_time.is_none() || value != reading.last_value;
            if changed {
                let delay = read_end - read_start;
                // Interval since the previous read attempt, emitted or
                // not; zero on the very first read of the channel.
                let confidence_interval = reading.last_time.map_or(0.0, |t| read_end - t);

                if sink.enabled() {
                    sink.publish(DaqEvent::SingleChannel(SingleChannelEvent {
                        device_id: self.device_id,
                        event_id: ids.next_id(),
                        channel_name: channel.name().to_string(),
                        logged_time: read_end,
                        hub_time: read_end - delay,
                        confidence_interval,
                        delay,
                        float_value: value,
                        int_value: 0,
                    }));
                    emitted += 1;
                }
                *reading = ChannelReading {
                    last_time: Some(read_start),
                    last_value: value,
                };
            } else {
                // Debounce: refresh the timestamp only.
                reading.last_time = Some(read_start);
            }
        }

        trace!(emitted = emitted, "Sequential poll complete");
        Ok(emitted)
    }
}

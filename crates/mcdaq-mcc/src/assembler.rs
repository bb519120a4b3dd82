//! Multi-channel event assembly and timestamp derivation.

use crate::buffer::SampleBuffer;
use crate::timing::AcquisitionEpoch;
use mcdaq_core::{MultiChannelEvent, READ_CHANNELS_PER_GROUP};

/// Builds one [`MultiChannelEvent`] from a completed sample group.
///
/// Timestamps are derived from the logical sequence index and the
/// acquisition epoch:
///
/// ```text
/// hub_time   = sequence_index / scan_frequency_hz + epoch.post_start
/// delay      = logged_time - hub_time
/// confidence = epoch.post_start - epoch.pre_start
/// ```
#[derive(Debug)]
pub struct EventAssembler {
    device_id: u32,
    scan_frequency_hz: f64,
}

impl EventAssembler {
    pub fn new(device_id: u32, scan_frequency_hz: u32) -> Self {
        Self {
            device_id,
            scan_frequency_hz: f64::from(scan_frequency_hz),
        }
    }

    /// Update the rate after the hardware reports the achieved one.
    pub fn set_scan_frequency(&mut self, scan_frequency_hz: u32) {
        self.scan_frequency_hz = f64::from(scan_frequency_hz);
    }

    pub fn scan_frequency_hz(&self) -> f64 {
        self.scan_frequency_hz
    }

    /// Assemble the group whose first slot is `first_slot`.
    ///
    /// `logged_time` is the wall-clock time captured when the poll
    /// observed the new status; every group consumed within one poll
    /// cycle shares it.
    pub fn assemble(
        &self,
        buffer: &SampleBuffer,
        first_slot: usize,
        logged_time: f64,
        epoch: &AcquisitionEpoch,
        event_id: u64,
    ) -> MultiChannelEvent {
        let sequence_index = buffer.sequence_at(first_slot);
        let hub_time = sequence_index as f64 / self.scan_frequency_hz + epoch.post_start;

        let mut values = [0.0; READ_CHANNELS_PER_GROUP];
        for (value, raw) in values.iter_mut().zip(buffer.group_values(first_slot)) {
            *value = f64::from(*raw);
        }

        MultiChannelEvent {
            device_id: self.device_id,
            event_id,
            sequence_index,
            logged_time,
            hub_time,
            confidence_interval: epoch.confidence_interval(),
            delay: logged_time - hub_time,
            values,
        }
    }
}

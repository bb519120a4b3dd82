//! Simulated Measurement Computing board.

use mcdaq_core::{
    DaqBoard, DriverError, DriverErrorKind, Gain, ScanRequest, ScanSnapshot, ScanStatus,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Simulated board implementing the `DaqBoard` capability.
///
/// Two driving styles, freely mixable:
///
/// - **Scripted**: push exact [`ScanSnapshot`]s with
///   [`MockBoard::push_snapshot`] and place slot values with
///   [`MockBoard::write_slots`]; status reads pop the script in order.
/// - **Free-running**: call [`MockBoard::produce`] to write a synthetic
///   ramp into the circular buffer; status reads then report the
///   simulated cursor position directly.
#[derive(Debug, Default)]
pub struct MockBoard {
    status: ScanStatus,
    scan_buffer: Vec<u16>,
    capacity: usize,
    produced: u64,
    next_value: u16,
    rate_override: Option<u32>,
    scripted: VecDeque<ScanSnapshot>,
    status_failures: u32,
    channel_values: HashMap<u16, f64>,
    failing_channels: HashSet<u16>,
    start_count: u32,
    stop_count: u32,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this rate from `start_background_scan` instead of the
    /// requested one, simulating hardware rate adjustment.
    pub fn with_adjusted_rate(mut self, hz: u32) -> Self {
        self.rate_override = Some(hz);
        self
    }

    /// Queue one scripted status snapshot.
    pub fn push_snapshot(&mut self, status: ScanStatus, current_count: u32, current_index: u32) {
        self.scripted.push_back(ScanSnapshot {
            status,
            current_count,
            current_index,
        });
    }

    /// Place raw values directly into the scan buffer.
    pub fn write_slots(&mut self, start: usize, values: &[u16]) {
        if self.capacity == 0 {
            return;
        }
        for (offset, &value) in values.iter().enumerate() {
            let index = (start + offset) % self.capacity;
            self.scan_buffer[index] = value;
        }
    }

    /// Free-run the scan: write `n` ramp samples at the cursor,
    /// wrapping at capacity. No-op unless a scan is running.
    pub fn produce(&mut self, n: usize) {
        if !self.status.is_running() || self.capacity == 0 {
            return;
        }
        for _ in 0..n {
            let index = (self.produced % self.capacity as u64) as usize;
            self.scan_buffer[index] = self.next_value;
            self.next_value = self.next_value.wrapping_add(1);
            self.produced += 1;
        }
    }

    /// Make the next `read_status` call fail. Stackable.
    pub fn fail_next_status(&mut self) {
        self.status_failures += 1;
    }

    /// Set the value a sequential `read_channel` returns.
    pub fn set_channel(&mut self, channel: u16, value: f64) {
        self.channel_values.insert(channel, value);
    }

    /// Make reads of `channel` fail until cleared.
    pub fn fail_channel(&mut self, channel: u16) {
        self.failing_channels.insert(channel);
    }

    pub fn clear_channel_failure(&mut self, channel: u16) {
        self.failing_channels.remove(&channel);
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    /// Raw contents of the simulated scan buffer.
    pub fn scan_buffer(&self) -> &[u16] {
        &self.scan_buffer
    }
}

impl DaqBoard for MockBoard {
    fn read_status(&mut self) -> Result<ScanSnapshot, DriverError> {
        if self.status_failures > 0 {
            self.status_failures -= 1;
            return Err(DriverError::new(
                "mock",
                DriverErrorKind::Communication,
                "injected status read failure",
            ));
        }
        if let Some(snapshot) = self.scripted.pop_front() {
            self.status = snapshot.status;
            return Ok(snapshot);
        }
        Ok(ScanSnapshot {
            status: self.status,
            current_count: self.produced as u32,
            current_index: if self.capacity == 0 {
                0
            } else {
                (self.produced % self.capacity as u64) as u32
            },
        })
    }

    fn start_background_scan(&mut self, request: &ScanRequest) -> Result<u32, DriverError> {
        self.capacity = request.sample_count as usize;
        self.scan_buffer = vec![0; self.capacity];
        self.produced = 0;
        self.next_value = 0;
        self.status = ScanStatus::Running;
        self.start_count += 1;
        let achieved = self.rate_override.unwrap_or(request.scan_frequency_hz);
        debug!(
            sample_count = request.sample_count,
            achieved_hz = achieved,
            "Mock background scan started"
        );
        Ok(achieved)
    }

    fn stop_background_scan(&mut self) -> Result<(), DriverError> {
        self.status = ScanStatus::Idle;
        self.stop_count += 1;
        Ok(())
    }

    fn read_channel(&mut self, channel: u16, _gain: Gain) -> Result<f64, DriverError> {
        if self.failing_channels.contains(&channel) {
            return Err(DriverError::new(
                "mock",
                DriverErrorKind::Communication,
                format!("injected failure on channel {}", channel),
            ));
        }
        Ok(self.channel_values.get(&channel).copied().unwrap_or(0.0))
    }

    fn read_slot(&self, index: usize) -> u16 {
        self.scan_buffer[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(board: &mut MockBoard, sample_count: u32) {
        let request = ScanRequest {
            low_channel: 0,
            high_channel: 7,
            sample_count,
            scan_frequency_hz: 1000,
            gain: Gain::Bip10Volts,
        };
        board.start_background_scan(&request).unwrap();
    }

    #[test]
    fn produce_wraps_at_capacity() {
        let mut board = MockBoard::new();
        started(&mut board, 16);

        board.produce(20);
        let snapshot = board.read_status().unwrap();
        assert_eq!(snapshot.current_count, 20);
        assert_eq!(snapshot.current_index, 4);
        // Slots 0..4 were overwritten by the wrap.
        assert_eq!(board.read_slot(0), 16);
        assert_eq!(board.read_slot(4), 4);
    }

    #[test]
    fn scripted_snapshots_pop_in_order() {
        let mut board = MockBoard::new();
        started(&mut board, 16);
        board.push_snapshot(ScanStatus::Running, 8, 8);
        board.push_snapshot(ScanStatus::Idle, 8, 8);

        assert_eq!(board.read_status().unwrap().current_index, 8);
        assert_eq!(board.read_status().unwrap().status, ScanStatus::Idle);
        // Script exhausted: falls back to the simulated cursor.
        assert_eq!(board.read_status().unwrap().status, ScanStatus::Idle);
    }

    #[test]
    fn channel_failure_injection() {
        let mut board = MockBoard::new();
        board.set_channel(2, 1.25);
        board.fail_channel(2);
        assert!(board.read_channel(2, Gain::Bip10Volts).is_err());
        board.clear_channel_failure(2);
        assert_eq!(board.read_channel(2, Gain::Bip10Volts).unwrap(), 1.25);
    }
}

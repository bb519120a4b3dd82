//! Continuous-scan polling.
//!
//! One poll cycle reads the hardware scan cursor, walks the slots that
//! became valid since the previous cycle (wrap tail first), demuxes
//! them into the sample buffer and emits one multi-channel event per
//! completed group. Slots are consumed in strictly increasing write
//! order, so emitted events are monotonic in sequence index across and
//! within calls.
//!
//! The poller trusts the soft real-time assumption that it is invoked
//! faster than the hardware wraps the buffer; a violation silently
//! drops or duplicates samples and is not detected here.

use crate::assembler::EventAssembler;
use crate::buffer::SampleBuffer;
use crate::config::ScanPlan;
use crate::cursor::{CursorAdvance, ScanCursor};
use crate::error::Result;
use crate::timing::AcquisitionEpoch;
use mcdaq_core::{
    Clock, DaqBoard, DaqEvent, EventIdSource, EventSink, ScanRequest, ScanStatus,
    READ_CHANNELS_PER_GROUP,
};
use tracing::{debug, info, trace, warn};

/// Poll-cycle orchestrator for continuous background-scan mode.
#[derive(Debug)]
pub struct ScanningPoller {
    request: ScanRequest,
    cursor: ScanCursor,
    buffer: SampleBuffer,
    assembler: EventAssembler,
    epoch: AcquisitionEpoch,
    events_created: u64,
    running: bool,
}

impl ScanningPoller {
    pub fn new(plan: &ScanPlan) -> Self {
        Self {
            request: plan.scan_request(),
            cursor: ScanCursor::new(plan.sample_count),
            buffer: SampleBuffer::new(plan.sample_count),
            assembler: EventAssembler::new(plan.board_id, plan.scan_frequency_hz),
            epoch: AcquisitionEpoch::default(),
            events_created: 0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Slots consumed since acquisition start (also the next slot's
    /// logical write count).
    pub fn events_created(&self) -> u64 {
        self.events_created
    }

    pub fn wrap_count(&self) -> u64 {
        self.cursor.wrap_count()
    }

    pub fn epoch(&self) -> AcquisitionEpoch {
        self.epoch
    }

    /// Start the background scan.
    ///
    /// Zeroes all cursor and buffer state, captures the acquisition
    /// epoch around the driver start call and re-reads the achieved
    /// scan rate from it.
    pub fn start(&mut self, board: &mut dyn DaqBoard, clock: &dyn Clock) -> Result<()> {
        self.cursor.reset();
        self.buffer.zero();
        self.events_created = 0;

        let pre_start = clock.now();
        let achieved_hz = board.start_background_scan(&self.request)?;
        let post_start = clock.now();

        self.epoch = AcquisitionEpoch::new(pre_start, post_start);
        self.assembler.set_scan_frequency(achieved_hz);
        self.cursor.set_status(ScanStatus::Running);
        self.running = true;

        info!(
            requested_hz = self.request.scan_frequency_hz,
            achieved_hz = achieved_hz,
            sample_count = self.request.sample_count,
            "Started background scan"
        );
        Ok(())
    }

    /// Stop the background scan, zero the buffer and clear the epoch.
    pub fn stop(&mut self, board: &mut dyn DaqBoard) -> Result<()> {
        if !self.running {
            return Ok(());
        }

        board.stop_background_scan()?;
        self.buffer.zero();
        self.epoch.clear();
        self.cursor.set_status(ScanStatus::Idle);
        self.running = false;

        info!(
            events_created = self.events_created,
            wraps = self.cursor.wrap_count(),
            "Stopped background scan"
        );
        Ok(())
    }

    /// Run one poll cycle. Returns the number of events emitted.
    pub fn poll(
        &mut self,
        board: &mut dyn DaqBoard,
        clock: &dyn Clock,
        sink: &dyn EventSink,
        ids: &dyn EventIdSource,
    ) -> Result<usize> {
        if !self.running {
            warn!("MC DAQ not running; scanning poll skipped");
            return Ok(0);
        }

        // Steady-state faults are absorbed: a failed status read costs
        // one cycle, never the poll loop. Only start/stop errors reach
        // the caller.
        let snapshot = match board.read_status() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "Status read failed; skipping this cycle");
                return Ok(0);
            }
        };
        let logged_time = clock.now();

        if let ScanStatus::Other(raw) = snapshot.status {
            warn!(status = raw, "Unexpected scan status; treating as not running");
        }

        match self.cursor.advance(&snapshot) {
            CursorAdvance::NoChange => Ok(0),
            CursorAdvance::Advanced(range) => {
                let mut emitted = 0;
                for slot in range.slots() {
                    emitted += self.consume_slot(board, slot, logged_time, sink, ids);
                }
                trace!(
                    slots = range.len(),
                    emitted = emitted,
                    events_created = self.events_created,
                    "Consumed scan range"
                );
                Ok(emitted)
            }
        }
    }

    /// Demux one slot into the buffer; emit when it completes a group.
    ///
    /// The slot counter advances whether or not the sink accepts
    /// events, so buffer bookkeeping stays correct while reporting is
    /// disabled.
    fn consume_slot(
        &mut self,
        board: &dyn DaqBoard,
        slot: usize,
        logged_time: f64,
        sink: &dyn EventSink,
        ids: &dyn EventIdSource,
    ) -> usize {
        let group = READ_CHANNELS_PER_GROUP as u64;
        let channel = (self.events_created % group) as u16;
        let sequence_index = self.events_created / group;

        self.buffer
            .record(slot, board.read_slot(slot), channel, sequence_index);

        let mut emitted = 0;
        if usize::from(channel) == READ_CHANNELS_PER_GROUP - 1 && sink.enabled() {
            let first_slot = slot - usize::from(channel);
            let event = self.assembler.assemble(
                &self.buffer,
                first_slot,
                logged_time,
                &self.epoch,
                ids.next_id(),
            );
            debug!(
                sequence_index = event.sequence_index,
                hub_time = event.hub_time,
                "Assembled multi-channel event"
            );
            sink.publish(DaqEvent::MultiChannel(event));
            emitted = 1;
        }
        self.events_created += 1;
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DaqModel, McDaqConfig, ReadMethod};
    use mcdaq_core::{AtomicEventIds, BufferedSink};
    use mcdaq_mock::{ManualClock, MockBoard};

    fn plan() -> ScanPlan {
        McDaqConfig {
            board_id: 0,
            daq_model: DaqModel::Usb1208Fs,
            input_channels: vec!["AI_0".to_string()],
            gain: Default::default(),
            input_scan_frequency: 1000,
            input_read_method: ReadMethod::Scan,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn stop_zeroes_buffer_contents() {
        let mut board = MockBoard::new();
        let clock = ManualClock::new(0.0);
        let sink = BufferedSink::default();
        let ids = AtomicEventIds::new();
        let mut poller = ScanningPoller::new(&plan());

        poller.start(&mut board, &clock).unwrap();
        board.produce(8);
        poller.poll(&mut board, &clock, &sink, &ids).unwrap();
        // The ramp left nonzero values and channel tags behind.
        assert!((0..8).any(|i| poller.buffer.slot(i).raw_value != 0));
        assert!((0..8).any(|i| poller.buffer.slot(i).channel != 0));

        poller.stop(&mut board).unwrap();
        for i in 0..poller.buffer.capacity() {
            assert_eq!(poller.buffer.slot(i).raw_value, 0);
            assert_eq!(poller.buffer.slot(i).channel, 0);
            assert_eq!(poller.buffer.sequence_at(i), 0);
        }
    }
}

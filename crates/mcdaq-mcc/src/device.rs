//! Device orchestration: mode selection, enable/disable, poll entry.

use crate::config::{McDaqConfig, ReadMethod, ScanPlan};
use crate::error::Result;
use crate::scanning::ScanningPoller;
use crate::sequential::SequentialPoller;
use mcdaq_core::{Clock, DaqBoard, EventIdSource, EventSink};
use std::sync::Arc;
use tracing::{info, warn};

/// Acquisition strategy, selected from the configured read method.
///
/// An explicit enum rather than swappable function state: the two
/// pollers carry different per-mode state and the mode is fixed for
/// the lifetime of the device.
#[derive(Debug)]
enum Poller {
    Scanning(ScanningPoller),
    Sequential(SequentialPoller),
}

/// A Measurement Computing DAQ device bound to one board.
///
/// Single-threaded cooperative model: an external scheduler invokes
/// [`McDaq::poll`] periodically; nothing here spawns threads or blocks
/// beyond the synchronous driver calls it wraps.
pub struct McDaq<B: DaqBoard> {
    board: B,
    plan: ScanPlan,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn EventIdSource>,
    sink: Arc<dyn EventSink>,
    poller: Poller,
    enabled: bool,
}

impl<B: DaqBoard> McDaq<B> {
    /// Validate the configuration and bind the device to a board.
    ///
    /// Fails on configuration errors only; nothing touches the
    /// hardware until [`McDaq::enable`].
    pub fn new(
        board: B,
        config: &McDaqConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn EventIdSource>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let plan = config.validate()?;
        let poller = match plan.read_method {
            ReadMethod::Scan => Poller::Scanning(ScanningPoller::new(&plan)),
            ReadMethod::Poll => Poller::Sequential(SequentialPoller::new(&plan)),
        };

        info!(
            board_id = plan.board_id,
            model = plan.model.label(),
            channels = plan.channels.len(),
            read_method = ?plan.read_method,
            "Configured MC DAQ device"
        );

        Ok(Self {
            board,
            plan,
            clock,
            ids,
            sink,
            poller,
            enabled: false,
        })
    }

    pub fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Begin acquisition: starts the background scan in scan mode,
    /// clears the reading cache in sequential mode.
    pub fn enable(&mut self) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        match &mut self.poller {
            Poller::Scanning(poller) => poller.start(&mut self.board, &*self.clock)?,
            Poller::Sequential(poller) => poller.reset(),
        }
        self.enabled = true;
        Ok(())
    }

    /// Stop acquisition; in scan mode this stops the hardware scan,
    /// zeroes the buffer and clears the epoch.
    pub fn disable(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Poller::Scanning(poller) = &mut self.poller {
            poller.stop(&mut self.board)?;
        }
        self.enabled = false;
        Ok(())
    }

    /// Run one poll cycle. Returns the number of events emitted.
    ///
    /// Polling while disabled is an expected idle condition, reported
    /// at warning level, never an error.
    pub fn poll(&mut self) -> Result<usize> {
        if !self.enabled {
            warn!("Poll while acquisition disabled; nothing to do");
            return Ok(0);
        }
        match &mut self.poller {
            Poller::Scanning(poller) => {
                poller.poll(&mut self.board, &*self.clock, &*self.sink, &*self.ids)
            }
            Poller::Sequential(poller) => {
                poller.poll(&mut self.board, &*self.clock, &*self.sink, &*self.ids)
            }
        }
    }

    /// The scanning poller, when the device runs in scan mode.
    pub fn scanning(&self) -> Option<&ScanningPoller> {
        match &self.poller {
            Poller::Scanning(poller) => Some(poller),
            Poller::Sequential(_) => None,
        }
    }

    /// Direct access to the underlying board (simulation and tests).
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

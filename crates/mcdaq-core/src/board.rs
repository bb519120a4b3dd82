//! Abstract board interface for Measurement Computing style hardware.
//!
//! The vendor library is modeled as an injected capability rather than
//! an FFI surface: the acquisition engine only ever observes the
//! hardware through this trait. The continuous background scan fills a
//! device-owned sample buffer; the engine reads that buffer through
//! [`DaqBoard::read_slot`] guided by periodic [`ScanSnapshot`]s of the
//! write cursor.

use crate::error::DriverError;
use serde::{Deserialize, Serialize};

/// Analog input gain / voltage range option.
///
/// Only the bipolar 10 V range is supported by the engine today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gain {
    #[default]
    #[serde(rename = "BIP10VOLTS")]
    Bip10Volts,
}

/// Run state reported by the hardware status read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanStatus {
    /// Background scan not running.
    #[default]
    Idle,
    /// Background scan filling the buffer.
    Running,
    /// Any status word the engine does not recognize. Treated as "not
    /// running" for the cycle and logged; unreachable in normal
    /// operation.
    Other(i16),
}

impl ScanStatus {
    pub fn is_running(self) -> bool {
        matches!(self, ScanStatus::Running)
    }
}

/// Snapshot of the hardware scan cursor, one per status read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSnapshot {
    pub status: ScanStatus,
    /// Total samples transferred so far in the current run.
    pub current_count: u32,
    /// Write position within the circular buffer, in `[0, capacity)`.
    pub current_index: u32,
}

/// Parameters for starting a continuous background scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    /// First hardware channel of the scanned block.
    pub low_channel: u16,
    /// Last hardware channel of the scanned block (inclusive).
    pub high_channel: u16,
    /// Circular buffer capacity in samples.
    pub sample_count: u32,
    /// Requested per-channel scan rate in Hz. The hardware may adjust
    /// this to the nearest achievable rate; the achieved rate is the
    /// return value of [`DaqBoard::start_background_scan`].
    pub scan_frequency_hz: u32,
    pub gain: Gain,
}

/// Board capability the acquisition engine is built against.
///
/// Implementations wrap the vendor driver (or simulate it). All calls
/// are synchronous and assumed fast; the engine invokes them only from
/// its single-threaded poll path.
pub trait DaqBoard: Send {
    /// Snapshot the scan cursor (`cbGetStatus` equivalent).
    fn read_status(&mut self) -> Result<ScanSnapshot, DriverError>;

    /// Begin the continuous background scan filling the board buffer.
    ///
    /// Returns the scan rate actually programmed, which may differ from
    /// the requested one.
    fn start_background_scan(&mut self, request: &ScanRequest) -> Result<u32, DriverError>;

    /// Stop the background scan (`cbStopBackground` equivalent).
    fn stop_background_scan(&mut self) -> Result<(), DriverError>;

    /// Single blocking analog read of one channel (`cbVIn` equivalent).
    /// Used by sequential polling only.
    fn read_channel(&mut self, channel: u16, gain: Gain) -> Result<f64, DriverError>;

    /// Raw value at one slot of the board-owned scan buffer.
    ///
    /// Valid only for indices below the `sample_count` the scan was
    /// started with; implementations may panic on out-of-range access.
    fn read_slot(&self, index: usize) -> u16;
}

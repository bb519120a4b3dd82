//! Acquisition engine for Measurement Computing USB DAQ devices.
//!
//! The engine reconstructs time-stamped multi-channel events from a
//! hardware-filled circular sample buffer it does not pace:
//!
//! 1. The board's background scan interleaves per-channel samples into
//!    its circular buffer (DMA-like, observed only through cursor
//!    snapshots).
//! 2. Each [`device::McDaq::poll`] cycle advances a [`cursor::ScanCursor`]
//!    from a fresh snapshot, walks the newly-valid slots (wrap tail
//!    before head) into the [`buffer::SampleBuffer`], and emits one
//!    [`mcdaq_core::MultiChannelEvent`] per completed 8-channel group
//!    via the [`assembler::EventAssembler`].
//! 3. Alternatively, sequential mode ([`sequential::SequentialPoller`])
//!    reads each channel directly and debounces unchanged values.
//!
//! The board, clock, id source and event sink are injected capabilities
//! from `mcdaq-core`; no state persists across acquisition starts.

pub mod assembler;
pub mod buffer;
pub mod config;
pub mod cursor;
pub mod device;
pub mod error;
pub mod scanning;
pub mod sequential;
pub mod timing;

pub use assembler::EventAssembler;
pub use buffer::{SampleBuffer, SampleSlot};
pub use config::{DaqModel, McDaqConfig, ReadMethod, ScanPlan, DEFAULT_SCAN_FREQUENCY_HZ};
pub use cursor::{AdvanceRange, CursorAdvance, ScanCursor};
pub use device::McDaq;
pub use error::{McError, Result};
pub use scanning::ScanningPoller;
pub use sequential::SequentialPoller;
pub use timing::AcquisitionEpoch;

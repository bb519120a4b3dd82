//! Core types and capability traits for the mcdaq acquisition engine.
//!
//! This crate defines the seams between the acquisition engine
//! (`mcdaq-mcc`) and its collaborators:
//!
//! - [`board::DaqBoard`] — the vendor driver, injected
//! - [`clock::Clock`] — the process time source
//! - [`event::EventIdSource`] — process-wide event ids
//! - [`sink::EventSink`] — downstream event delivery
//!
//! plus the event and channel data model shared by every crate in the
//! workspace.

pub mod board;
pub mod channel;
pub mod clock;
pub mod error;
pub mod event;
pub mod sink;

pub use board::{DaqBoard, Gain, ScanRequest, ScanSnapshot, ScanStatus};
pub use channel::{AnalogRange, Channel, ChannelKind};
pub use clock::{Clock, SystemClock};
pub use error::{DaqError, DaqResult, DriverError, DriverErrorKind};
pub use event::{
    AtomicEventIds, DaqEvent, EventIdSource, MultiChannelEvent, SingleChannelEvent,
    READ_CHANNELS_PER_GROUP,
};
pub use sink::{BufferedSink, EventSink, DEFAULT_SINK_CAPACITY};

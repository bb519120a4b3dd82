//! Simulated hardware for testing the mcdaq engine without a device.
//!
//! [`MockBoard`] implements the `DaqBoard` capability two ways at once:
//! tests can script exact cursor snapshots and slot contents for
//! deterministic scenarios, or call [`MockBoard::produce`] to let the
//! board free-run a synthetic ramp through its circular buffer the way
//! real hardware would. [`ManualClock`] is a hand-driven time source
//! for deterministic timestamps.

mod board;
mod clock;

pub use board::MockBoard;
pub use clock::ManualClock;

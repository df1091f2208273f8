//! Synthetic sensor readings for simulated IoT devices.
//!
//! Series cover a fixed 24-hour window ending one interval before "now" and
//! follow a smooth per-channel oscillation with independent per-sample jitter.

pub mod errors;
pub mod synth;
pub mod telemetry;

pub use errors::{Error, Result};
pub use synth::{generate, generate_with, latest_reading, latest_reading_with, DEFAULT_COUNT};
pub use telemetry::SensorReading;

use crate::errors::{Error, Result};
use crate::telemetry::SensorReading;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

/// Every series spans the 24 hours leading up to "now".
pub const WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

/// Samples per series when the caller does not ask for a specific count
pub const DEFAULT_COUNT: usize = 48;

/// Above this, neighbouring samples would share a millisecond timestamp.
pub const MAX_COUNT: usize = WINDOW_MS as usize;

/// Shape of one measured channel: a uniformly drawn baseline, a sinusoid over
/// the sample index and uniform jitter around zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelProfile {
    pub base_min: f64,
    pub base_span: f64,
    pub phase_divisor: f64,
    pub amplitude: f64,
    pub noise: f64,
}

pub const TEMPERATURE: ChannelProfile = ChannelProfile {
    base_min: 20.0,
    base_span: 10.0,
    phase_divisor: 5.0,
    amplitude: 3.0,
    noise: 2.0,
};

pub const PRESSURE: ChannelProfile = ChannelProfile {
    base_min: 1013.0,
    base_span: 20.0,
    phase_divisor: 8.0,
    amplitude: 5.0,
    noise: 3.0,
};

pub const ALTITUDE: ChannelProfile = ChannelProfile {
    base_min: 100.0,
    base_span: 200.0,
    phase_divisor: 6.0,
    amplitude: 10.0,
    noise: 5.0,
};

impl ChannelProfile {
    /// Inclusive bounds every sample of this channel stays within.
    pub fn envelope(&self) -> (f64, f64) {
        let swing = self.amplitude + self.noise / 2.0;
        (
            self.base_min - swing,
            self.base_min + self.base_span + swing,
        )
    }

    fn draw_base<R: Rng>(&self, rng: &mut R) -> f64 {
        self.base_min + rng.gen::<f64>() * self.base_span
    }

    fn sample<R: Rng>(&self, rng: &mut R, base: f64, index: usize) -> f64 {
        let wave = (index as f64 / self.phase_divisor).sin() * self.amplitude;
        let jitter = (rng.gen::<f64>() - 0.5) * self.noise;
        round_tenth(base + wave + jitter)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generates `count` readings for `device_id` using the thread-local RNG and
/// the current wall clock.
pub fn generate(device_id: &str, count: usize) -> Result<Vec<SensorReading>> {
    generate_with(&mut rand::thread_rng(), Utc::now(), device_id, count)
}

/// Generates `count` readings ending one interval before `now`.
///
/// The 24-hour window is split into `count` equal intervals and reading `i`
/// is stamped `now - (count - i) * interval`, so timestamps strictly increase
/// and the newest one is never exactly `now`. Baselines are drawn once per
/// call; jitter is drawn per sample. `device_id` is not checked against any
/// registry.
pub fn generate_with<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    device_id: &str,
    count: usize,
) -> Result<Vec<SensorReading>> {
    if count == 0 {
        return Err(Error::InvalidArgument(
            "Reading count must be at least 1".to_string(),
        ));
    }
    if count > MAX_COUNT {
        return Err(Error::InvalidArgument(format!(
            "Reading count {} exceeds maximum of {}",
            count, MAX_COUNT
        )));
    }

    let interval_ms = WINDOW_MS as f64 / count as f64;

    let base_temp = TEMPERATURE.draw_base(rng);
    let base_pressure = PRESSURE.draw_base(rng);
    let base_altitude = ALTITUDE.draw_base(rng);

    let mut readings = Vec::with_capacity(count);
    for i in 0..count {
        let offset_ms = ((count - i) as f64 * interval_ms).round() as i64;

        readings.push(SensorReading {
            id: SensorReading::reading_id(device_id, i),
            device_id: device_id.to_string(),
            timestamp: now - Duration::milliseconds(offset_ms),
            temperature: TEMPERATURE.sample(rng, base_temp, i),
            pressure: PRESSURE.sample(rng, base_pressure, i),
            altitude: ALTITUDE.sample(rng, base_altitude, i),
        });
    }

    debug!(
        "Generated {} readings for {} at {:.0}ms spacing",
        count, device_id, interval_ms
    );

    Ok(readings)
}

/// A fresh one-sample series. Every call redraws the baseline, so repeated
/// calls are not stable.
pub fn latest_reading(device_id: &str) -> Option<SensorReading> {
    latest_reading_with(&mut rand::thread_rng(), Utc::now(), device_id)
}

pub fn latest_reading_with<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    device_id: &str,
) -> Option<SensorReading> {
    generate_with(rng, now, device_id, 1).ok()?.pop()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped sample of a simulated device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    /// Celsius
    pub temperature: f64,
    /// hPa
    pub pressure: f64,
    /// Meters
    pub altitude: f64,
}

impl SensorReading {
    /// Reading ids are derived from the device and the sample position, so
    /// they repeat across regenerations.
    pub fn reading_id(device_id: &str, index: usize) -> String {
        format!("reading-{}-{}", device_id, index)
    }
}

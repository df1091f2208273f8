use crate::errors::{Error, Result};
use crate::model::{Device, NewDevice};
use chrono::{DateTime, Utc};

/// Sensor models a new device can be registered as
pub const SENSOR_TYPES: [&str; 4] = ["BME280", "DHT22", "BMP180", "SHT31"];

/// Validates a device creation request
pub fn validate_new_device(device: &NewDevice) -> Result<()> {
    if device.name.trim().is_empty() {
        return Err(Error::Validation("Device name cannot be empty".to_string()));
    }

    if !SENSOR_TYPES.contains(&device.kind.as_str()) {
        return Err(Error::Validation(format!(
            "Sensor type {:?} not one of {:?}",
            device.kind, SENSOR_TYPES
        )));
    }

    if device.location.trim().is_empty() {
        return Err(Error::Validation("Location cannot be empty".to_string()));
    }

    Ok(())
}

/// Turns an accepted submission into a device record. Nothing is stored.
pub fn device_from_submission(device: NewDevice, now: DateTime<Utc>) -> Device {
    Device {
        id: format!("device-{}", uuid::Uuid::new_v4()),
        name: device.name.trim().to_string(),
        kind: device.kind,
        location: device.location.trim().to_string(),
        status: device.status,
        last_seen: now,
    }
}

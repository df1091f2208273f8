use crate::errors::{Error, Result};
use crate::model::{Device, DeviceStatus, FleetSummary};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::info;

/// Read-only catalog of known devices, in declaration order.
#[derive(Debug, Clone)]
pub struct Registry {
    devices: Vec<Device>,
}

impl Registry {
    /// Builds a registry, rejecting duplicate device ids.
    pub fn new(devices: Vec<Device>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(devices.len());
        for device in &devices {
            if !seen.insert(device.id.as_str()) {
                return Err(Error::Validation(format!(
                    "Duplicate device id {}",
                    device.id
                )));
            }
        }

        info!("Device registry loaded with {} devices", devices.len());
        Ok(Self { devices })
    }

    pub fn list(&self) -> &[Device] {
        &self.devices
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    pub fn summary(&self) -> FleetSummary {
        let total = self.devices.len();
        let online = self
            .devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .count();
        let availability = if total == 0 {
            0
        } else {
            (online as f64 / total as f64 * 100.0).round() as u32
        };

        FleetSummary {
            total,
            online,
            availability,
        }
    }
}

/// The built-in demo fleet, with last-seen times relative to `now`.
pub fn fixture_devices(now: DateTime<Utc>) -> Vec<Device> {
    let device = |id: &str, name: &str, kind: &str, location: &str, status, ago: Duration| Device {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        location: location.to_string(),
        status,
        last_seen: now - ago,
    };

    vec![
        device(
            "device-001",
            "Office Sensor A",
            "Environmental Sensor",
            "Main Office",
            DeviceStatus::Online,
            Duration::zero(),
        ),
        device(
            "device-002",
            "Warehouse Sensor",
            "Environmental Sensor",
            "North Warehouse",
            DeviceStatus::Online,
            Duration::minutes(5),
        ),
        device(
            "device-003",
            "Outdoor Sensor",
            "Weather Station",
            "Building B Roof",
            DeviceStatus::Warning,
            Duration::minutes(15),
        ),
        device(
            "device-004",
            "Lab Sensor",
            "Environmental Sensor",
            "R&D Laboratory",
            DeviceStatus::Offline,
            Duration::hours(2),
        ),
    ]
}

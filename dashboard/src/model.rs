use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simulator::SensorReading;

use crate::chart::ChartSeries;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Online,
    Offline,
    Warning,
}

/// Simulated IoT device as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub status: DeviceStatus,
    pub last_seen: DateTime<Utc>,
}

/// Body of a device creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub online: usize,
    /// Percent of devices online, rounded
    pub availability: u32,
}

/// Device plus its human readable last-seen age
#[derive(Debug, Serialize)]
pub struct DeviceEntry {
    #[serde(flatten)]
    pub device: Device,
    pub last_seen_label: String,
}

#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub data: Vec<DeviceEntry>,
    pub summary: FleetSummary,
}

/// REST API response for a device's 24h history
#[derive(Debug, Serialize)]
pub struct ReadingsResponse {
    pub device: Device,
    pub data: Vec<SensorReading>,
    pub latest: Option<SensorReading>,
    pub charts: Vec<ChartSeries>,
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use simulator::SensorReading;

/// One measured quantity of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Pressure,
    Altitude,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Pressure, Channel::Altitude];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Pressure => "Atmospheric Pressure",
            Channel::Altitude => "Altitude",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Pressure => "hPa",
            Channel::Altitude => "m",
        }
    }

    pub fn value(&self, reading: &SensorReading) -> f64 {
        match self {
            Channel::Temperature => reading.temperature,
            Channel::Pressure => reading.pressure,
            Channel::Altitude => reading.altitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub channel: Channel,
    pub label: &'static str,
    pub unit: &'static str,
    pub points: Vec<ChartPoint>,
    pub latest: Option<f64>,
}

/// Projects one channel out of a reading sequence, keeping its order.
pub fn series(readings: &[SensorReading], channel: Channel) -> ChartSeries {
    let points: Vec<ChartPoint> = readings
        .iter()
        .map(|r| ChartPoint {
            timestamp: r.timestamp,
            value: channel.value(r),
        })
        .collect();
    let latest = points.last().map(|p| p.value);

    ChartSeries {
        channel,
        label: channel.label(),
        unit: channel.unit(),
        points,
        latest,
    }
}

pub fn all_series(readings: &[SensorReading]) -> Vec<ChartSeries> {
    Channel::ALL.iter().map(|&c| series(readings, c)).collect()
}

/// Relative age of a device's last contact, e.g. "5 min ago".
pub fn format_last_seen(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - last_seen).num_minutes();

    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{} min ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

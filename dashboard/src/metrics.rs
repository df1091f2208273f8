use crate::errors::Result;
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref REQUESTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_requests_total",
        "Total API requests served"
    ))
    .unwrap();
    pub static ref READINGS_GENERATED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_readings_generated_total",
        "Total synthetic readings generated"
    ))
    .unwrap();
    pub static ref DEVICE_NOT_FOUND_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_device_not_found_total",
        "Total lookups for unknown device ids"
    ))
    .unwrap();
    pub static ref DEVICES_SUBMITTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_devices_submitted_total",
        "Total accepted device creation requests"
    ))
    .unwrap();
    pub static ref DEVICES_REJECTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_devices_rejected_total",
        "Total device creation requests failing validation"
    ))
    .unwrap();
    pub static ref SYNTHESIS_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dashboard_synthesis_seconds",
            "Time taken to synthesize a reading series"
        )
        .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05])
    )
    .unwrap();
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(READINGS_GENERATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DEVICE_NOT_FOUND_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DEVICES_SUBMITTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DEVICES_REJECTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SYNTHESIS_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

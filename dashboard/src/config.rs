use clap::Parser;

/// Sensor dashboard API over simulated IoT devices
#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard", version)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// Readings per series when a request does not ask for a count
    #[arg(long, env = "DEFAULT_READINGS", default_value_t = simulator::DEFAULT_COUNT)]
    pub default_readings: usize,

    /// Upper bound on readings per series
    #[arg(long, env = "MAX_READINGS", default_value_t = 1000)]
    pub max_readings: usize,
}

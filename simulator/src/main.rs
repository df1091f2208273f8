use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simulator::{generate_with, latest_reading_with, Result, SensorReading, DEFAULT_COUNT};
use std::io::Write;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Print synthetic sensor readings for a simulated device as JSON
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    /// Device identifier stamped on every reading
    #[arg(long, env = "DEVICE", default_value = "device-001")]
    device: String,

    /// Number of readings spread over the last 24 hours
    #[arg(long, env = "COUNT", default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long, env = "SEED")]
    seed: Option<u64>,

    /// Keep emitting a fresh latest reading until interrupted
    #[arg(long)]
    follow: bool,

    /// Delay between readings in follow mode
    #[arg(long, env = "INTERVAL_MS", default_value_t = 1000)]
    interval_ms: u64,

    /// Pretty-print the series
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting sensor simulator for {}", args.device);

    let mut rng = match args.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    if args.follow {
        follow(&mut rng, &args).await;
        return;
    }

    if let Err(e) = print_series(&mut rng, &args) {
        error!("Failed to generate readings: {}", e);
        std::process::exit(1);
    }
}

fn print_series<R: Rng>(rng: &mut R, args: &Args) -> Result<()> {
    let readings = generate_with(rng, Utc::now(), &args.device, args.count)?;
    let payload = if args.pretty {
        serde_json::to_string_pretty(&readings)?
    } else {
        serde_json::to_string(&readings)?
    };
    println!("{}", payload);
    info!("Printed {} readings", readings.len());
    Ok(())
}

async fn follow<R: Rng>(rng: &mut R, args: &Args) {
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    let mut emitted = 0u64;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Emitting a reading every {}ms", args.interval_ms);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(reading) = latest_reading_with(rng, Utc::now(), &args.device) else {
                    warn!("No reading produced for {}", args.device);
                    continue;
                };
                if let Err(e) = emit(&reading) {
                    error!("Failed to write reading: {}", e);
                    break;
                }
                emitted += 1;
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Emitted {} readings", emitted);
}

fn emit(reading: &SensorReading) -> Result<()> {
    let line = serde_json::to_string(reading)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    Ok(())
}

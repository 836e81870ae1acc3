//! Semaforo host binary.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  LampBank<SimPin>    SimulatedDht22    SystemClock           │
//! │  (SignalActuator)    (SensorReader)    (Clock)               │
//! │  Async<TcpListener> ── http::server                          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  StateStore  ·  CycleScheduler  ·  SensorPoller        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_io_mini::Async;
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use semaforo::adapters::time::SystemClock;
use semaforo::app::state::StateStore;
use semaforo::config::SystemConfig;
use semaforo::drivers::lamps::LampBank;
use semaforo::drivers::sim_pin::SimPin;
use semaforo::pins;
use semaforo::runtime;
use semaforo::sensors::dht::SimulatedDht22;

#[derive(Debug, Parser)]
#[command(name = "semaforo", version, about = "Network-controllable traffic-light simulator")]
struct Cli {
    /// JSON config file. Missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the control server listens, e.g. 0.0.0.0:8080. Overrides the config file.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Make the simulated DHT22 fail every Nth read (0 = never).
    #[arg(long)]
    sensor_fail_every: Option<u32>,
}

static STORE: StateStore = StateStore::new();

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Semaforo v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config ─────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => SystemConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SystemConfig::default(),
    };
    if let Some(addr) = cli.listen {
        config.listen_addr = addr.to_string();
    }
    if let Some(n) = cli.sensor_fail_every {
        config.sim_sensor_fail_every = n;
    }
    config.validate().context("invalid configuration")?;

    // ── 2. Network ────────────────────────────────────────────
    let addr = config.listen_socket_addr()?;
    let listener =
        Async::<TcpListener>::bind(addr).with_context(|| format!("binding {}", addr))?;
    info!("HTTP: listening on http://{}", addr);

    // ── 3. Hardware ───────────────────────────────────────────
    let mut lamps = LampBank::new(
        SimPin::new(pins::RED_LAMP_GPIO),
        SimPin::new(pins::YELLOW_LAMP_GPIO),
        SimPin::new(pins::GREEN_LAMP_GPIO),
    )
    .context("initialising lamp outputs")?;
    let dht = SimulatedDht22::new(config.sim_sensor_fail_every);

    // ── 4. Run ────────────────────────────────────────────────
    info!("System ready.");
    runtime::run(&config, &STORE, listener, &mut lamps, dht, SystemClock::new())
        .context("controller stopped")?;
    Ok(())
}

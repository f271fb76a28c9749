//! Panel - keypad and 16x2 display console
//!
//! Runtime binary for Linux hosts. Runs the menu engine on an Embassy
//! executor with the display simulated on the terminal, keys typed on
//! stdin, monitor control through `ddcutil` and weather from OpenWeather.
//!
//! Usage: `panel-runtime [path/to/panel.toml]`

use std::path::Path;

use embassy_executor::Spawner;
use embassy_futures::select::{select4, Either4};
use static_cell::StaticCell;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use panel_core::MenuEngine;
use panel_protocol::{Align, Message};

use crate::channels::Channels;
use crate::config::load_config;
use crate::host::{stdin, DdcutilMonitor, OpenWeather, TerminalDisplay};
use crate::tasks::controller::now_ms;
use crate::tasks::{controller_task, keypad_task, tick_task, unix_now, weather_task};
use crate::tasks::{Exit, FetchWorker};

mod channels;
mod config;
mod host;
mod tasks;

/// Embedded default configuration, used when no config file is found
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

/// Config file read when no path is given
const DEFAULT_CONFIG_PATH: &str = "panel.toml";

/// Process exit status after an orderly shutdown
const EXIT_OK: i32 = 0;

/// Process exit status after a startup or fatal task failure
const EXIT_FAILURE: i32 = 1;

// Shared with the stdin and weather worker threads, so it must live forever
static CHANNELS: StaticCell<Channels> = StaticCell::new();

/// Route logs to stderr so stdout belongs to the simulated display
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    init_logging();
    info!("Panel runtime starting...");

    std::process::exit(run().await);
}

async fn run() -> i32 {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(Path::new(&path), EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    let channels: &'static Channels = CHANNELS.init(Channels::new());

    let now_unix = match unix_now() {
        Ok(now) => now,
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };
    let display = TerminalDisplay::stdout();
    let monitor = DdcutilMonitor::new(&config.monitor);
    let mut engine = match MenuEngine::new(display, monitor, &config, now_unix) {
        Ok(engine) => engine,
        Err(e) => {
            error!("display init failed: {}", e);
            return EXIT_FAILURE;
        }
    };
    info!("Display initialized");

    let splash = Message::aligned("Monitor", "Control", Align::None, Align::Right);
    engine.show_ephemeral(splash, config.overlay.duration_ms, now_ms());

    let source = OpenWeather::new(&config.weather);
    let worker = match FetchWorker::spawn(source, &channels.weather_done) {
        Ok(worker) => worker,
        Err(e) => {
            error!("cannot start weather worker: {}", e);
            return EXIT_FAILURE;
        }
    };
    if let Err(e) = stdin::spawn_reader(channels) {
        error!("cannot start stdin reader: {}", e);
        return EXIT_FAILURE;
    }

    let policy = config.supervisor.policy();
    // The first task to stop ends the run; the others are dropped
    let exit = match select4(
        controller_task(&mut engine, channels),
        keypad_task(channels, policy.clone()),
        tick_task(channels, policy.clone()),
        weather_task(channels, &worker, policy),
    )
    .await
    {
        Either4::First(()) => Exit::Requested,
        Either4::Second(exit) | Either4::Third(exit) | Either4::Fourth(exit) => exit,
    };

    info!("Shutting down: {:?}", exit);
    let goodbye = Message::aligned("Shutting", "Down", Align::Center, Align::Center);
    engine.show(goodbye);

    match exit {
        Exit::Requested => EXIT_OK,
        Exit::Fatal(task) => {
            error!("{} task failed too often", task);
            EXIT_FAILURE
        }
    }
}

//! Controller task
//!
//! Owns the menu engine. Waits for the next command or the next overlay
//! deadline, whichever comes first, and applies it. Runs until the future
//! is dropped at shutdown.

use core::future::pending;

use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use tracing::{debug, info, warn};

use panel_core::traits::Monitor;
use panel_core::MenuEngine;
use panel_display::DisplayBackend;

use crate::channels::{Channels, Command};
use crate::tasks::unix_now;

/// Milliseconds on the monotonic clock
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Sleep until `deadline_ms`, or forever if there is none
async fn deadline(deadline_ms: Option<u64>) {
    match deadline_ms {
        Some(ms) => Timer::at(Instant::from_millis(ms)).await,
        None => pending().await,
    }
}

/// Apply one command to the engine
pub fn handle_command<D: DisplayBackend, M: Monitor>(
    engine: &mut MenuEngine<D, M>,
    command: Command,
    now_ms: u64,
) {
    match command {
        Command::Key(event) => engine.handle_key(event, now_ms),
        Command::Post { line_one, line_two } => {
            if let Err(e) = engine.post_ephemeral_message(&line_one, &line_two, now_ms) {
                warn!("inbound message rejected: {}", e);
            }
        }
        Command::Minute(unix) => engine.on_minute(unix),
        Command::Weather(result) => match unix_now() {
            Ok(unix) => engine.apply_weather(result, unix),
            Err(e) => warn!("dropping weather update: {}", e),
        },
    }
}

pub async fn controller_task<D: DisplayBackend, M: Monitor>(
    engine: &mut MenuEngine<D, M>,
    channels: &'static Channels,
) {
    info!("Controller task started");

    loop {
        // The first page may already want data
        if let Some(reason) = engine.take_refresh_request() {
            // Merge with a request the weather task has not picked up yet
            let reason = match channels.weather_refresh.try_take() {
                Some(pending) => pending.max(reason),
                None => reason,
            };
            debug!("requesting weather refresh ({:?})", reason);
            channels.weather_refresh.signal(reason);
        }

        match select(channels.commands.receive(), deadline(engine.next_deadline())).await {
            Either::First(command) => handle_command(engine, command, now_ms()),
            Either::Second(()) => engine.expire_overlays(now_ms()),
        }
    }
}

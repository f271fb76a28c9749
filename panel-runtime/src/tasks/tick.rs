//! Minute tick task
//!
//! Sleeps until the wall clock crosses into the next minute and tells the
//! controller, which:
//! - redraws the clock on the weather page
//! - requests a full weather refresh on the quarter hour

use embassy_time::{Duration, Timer};

use panel_core::clock::seconds_until_next_minute;
use panel_core::RestartPolicy;

use crate::channels::{Channels, Command};
use crate::tasks::supervisor::{supervise, TaskError};
use crate::tasks::{unix_now, Exit};

/// Extra sleep so a slightly early wake-up still lands in the new minute
const TICK_MARGIN_MS: u64 = 50;

/// Time to sleep from `unix_secs` to just past the next minute boundary
pub fn time_to_next_tick(unix_secs: i64) -> Duration {
    Duration::from_secs(seconds_until_next_minute(unix_secs))
        + Duration::from_millis(TICK_MARGIN_MS)
}

async fn tick(channels: &'static Channels) -> Result<(), TaskError> {
    loop {
        Timer::after(time_to_next_tick(unix_now()?)).await;
        channels.commands.send(Command::Minute(unix_now()?)).await;
    }
}

/// Tick task - one `Minute` command per wall clock minute
pub async fn tick_task(channels: &'static Channels, policy: RestartPolicy) -> Exit {
    match supervise("Tick", policy, || tick(channels)).await {
        Ok(()) => Exit::Requested,
        Err(_) => Exit::Fatal("tick"),
    }
}

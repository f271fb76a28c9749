//! Task supervision
//!
//! `supervise` runs a task factory and restarts the task each time it
//! fails, until the restart policy gives up. A task that returns `Ok` is
//! finished and is not restarted. Dropping the future cancels the task and
//! nothing is retried.

use core::fmt;
use core::future::Future;

use embassy_time::Instant;
use tracing::{error, info, warn};

use panel_core::supervisor::{RestartPolicy, Verdict};
use panel_core::weather::WeatherError;

/// Failures reported by supervised tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    /// Console input could not be read
    Input,
    /// System clock is before the unix epoch
    Clock,
    /// Weather fetch failed
    Weather(WeatherError),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Input => f.write_str("console input failed"),
            TaskError::Clock => f.write_str("system clock unavailable"),
            TaskError::Weather(e) => write!(f, "{}", e),
        }
    }
}

impl From<WeatherError> for TaskError {
    fn from(e: WeatherError) -> Self {
        TaskError::Weather(e)
    }
}

/// Run `task` under `policy`
///
/// Returns `Ok` when the task finishes on its own, or the last error once
/// the policy declares the failures fatal.
pub async fn supervise<F, Fut>(
    name: &'static str,
    mut policy: RestartPolicy,
    mut task: F,
) -> Result<(), TaskError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), TaskError>>,
{
    info!("{} task started", name);

    loop {
        let e = match task().await {
            Ok(()) => {
                info!("{} task finished", name);
                return Ok(());
            }
            Err(e) => e,
        };

        match policy.on_failure(Instant::now().as_millis()) {
            Verdict::Restart => {
                warn!(
                    "{} task failed: {}; restarting ({} of {} in window)",
                    name,
                    e,
                    policy.recent_restarts(),
                    policy.max_restarts()
                );
            }
            Verdict::Fatal => {
                error!("{} task failed: {}; restart limit reached", name, e);
                return Err(e);
            }
        }
    }
}

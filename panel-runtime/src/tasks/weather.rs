//! Weather refresh task
//!
//! Waits for the controller to ask for fresh data, hands the blocking fetch
//! to a worker thread and passes the outcome back. A failed fetch is always
//! shown (the page degrades to "Failed to Pull"). Only failures of scheduled
//! quarter-hour refreshes are reported to the supervisor; a refresh started
//! by the user returning to the page is not charged against the restart
//! budget. Requests that arrive while a fetch is running collapse into one.

use std::io;
use std::sync::mpsc;
use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use tracing::{debug, info, warn};

use panel_core::traits::WeatherSource;
use panel_core::weather::{RefreshReason, WeatherError, WeatherReading};
use panel_core::RestartPolicy;

use crate::channels::{Channels, Command};
use crate::tasks::supervisor::{supervise, TaskError};
use crate::tasks::Exit;

/// Where the worker reports each fetch
pub type FetchDone = Signal<CriticalSectionRawMutex, Result<WeatherReading, WeatherError>>;

/// Handle to the thread running blocking fetches
pub struct FetchWorker {
    requests: mpsc::Sender<()>,
}

impl FetchWorker {
    /// Move `source` onto its own thread; results land in `done`
    pub fn spawn<S>(mut source: S, done: &'static FetchDone) -> io::Result<Self>
    where
        S: WeatherSource + Send + 'static,
    {
        let (requests, rx) = mpsc::channel::<()>();
        thread::Builder::new()
            .name("weather".into())
            .spawn(move || {
                while rx.recv().is_ok() {
                    done.signal(source.fetch());
                }
            })?;
        Ok(Self { requests })
    }

    fn request(&self) -> Result<(), TaskError> {
        self.requests
            .send(())
            .map_err(|_| TaskError::Weather(WeatherError::Transport))
    }
}

async fn refresh(channels: &'static Channels, worker: &FetchWorker) -> Result<(), TaskError> {
    loop {
        let reason = channels.weather_refresh.wait().await;
        debug!("fetching weather ({:?})", reason);
        worker.request()?;

        let result = channels.weather_done.wait().await;
        channels.commands.send(Command::Weather(result.clone())).await;
        match result {
            Ok(reading) => info!("weather: {} {:.0}", reading.condition, reading.temperature),
            // Nothing to retry until the configuration changes
            Err(WeatherError::Misconfigured) => {}
            Err(e) if reason == RefreshReason::Activation => {
                warn!("weather refresh on activation failed: {}", e)
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Weather task - one fetch per refresh request
pub async fn weather_task(
    channels: &'static Channels,
    worker: &FetchWorker,
    policy: RestartPolicy,
) -> Exit {
    match supervise("Weather", policy, || refresh(channels, worker)).await {
        Ok(()) => Exit::Requested,
        Err(_) => Exit::Fatal("weather"),
    }
}

// src/jobs/scheduler.rs

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{error, info};
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

/// A background action repeated at a fixed period for as long as the job lives.
///
/// The first run happens as soon as the job starts. A failed run is logged and
/// the job simply waits for its next tick.
pub struct ScheduledJob {
    name: &'static str,
    handle: AbortHandle,
}

impl ScheduledJob {
    pub fn start<F, Fut, E>(name: &'static str, period: Duration, mut action: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = action().await {
                    error!("Scheduled {} error: {}", name, e);
                }
            }
        })
        .abort_handle();

        info!("Started {} job, every {}s", name, period.as_secs());
        Self { name, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
        info!("Stopped {} job", self.name);
    }
}

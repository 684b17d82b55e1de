// src/jobs/mod.rs

//! Fixed-interval background work owned by the server process.

mod license;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use reqwest::Client;

use crate::config::Config;
use crate::store::TaskStore;

pub use license::refresh_license_file;
pub use scheduler::ScheduledJob;

/// The jobs started with the server; dropped only through [`BackgroundJobs::shutdown`].
pub struct BackgroundJobs {
    license_refresh: ScheduledJob,
    task_wipe: ScheduledJob,
}

impl BackgroundJobs {
    pub fn start(config: &Config, store: Arc<dyn TaskStore>) -> Self {
        Self {
            license_refresh: start_license_refresh(
                Client::new(),
                config.license_url.clone(),
                PathBuf::from(&config.license_path),
                config.license_refresh_interval,
            ),
            task_wipe: start_task_wipe(store, config.task_wipe_interval),
        }
    }

    pub fn shutdown(self) {
        for job in [&self.license_refresh, &self.task_wipe] {
            if job.is_running() {
                job.stop();
            }
        }
        info!(
            "Background jobs stopped: {}, {}",
            self.license_refresh.name(),
            self.task_wipe.name()
        );
    }
}

/// Rewrites the local license file from `url` on every tick.
pub fn start_license_refresh(client: Client, url: String, path: PathBuf, period: Duration) -> ScheduledJob {
    ScheduledJob::start("license refresh", period, move || {
        let client = client.clone();
        let url = url.clone();
        let path = path.clone();
        async move { refresh_license_file(&client, &url, &path).await }
    })
}

/// Deletes every task, completed or not, on every tick.
pub fn start_task_wipe(store: Arc<dyn TaskStore>, period: Duration) -> ScheduledJob {
    ScheduledJob::start("task wipe", period, move || {
        let store = store.clone();
        async move {
            let removed = store.clear_all_tasks().await?;
            info!("Cleared {} tasks", removed.len());
            Ok::<_, crate::error::StoreError>(())
        }
    })
}

// src/jobs/license.rs

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("failed to fetch license: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to fetch license: {0}")]
    Status(StatusCode),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads the license text at `url` and overwrites `path` with it.
pub async fn refresh_license_file(client: &Client, url: &str, path: &Path) -> Result<(), LicenseError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LicenseError::Status(status));
    }
    let license_text = response.text().await?;

    tokio::fs::write(path, license_text)
        .await
        .map_err(|source| LicenseError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!("{} updated successfully", path.display());
    Ok(())
}

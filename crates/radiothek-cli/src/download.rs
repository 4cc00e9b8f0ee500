//! Download engine: idempotent, progress-observable file downloads.
//!
//! One transfer runs at a time; the only concurrency is the optional
//! progress reporter, which observes the growing file through filesystem
//! metadata and never touches the file handle or the network. The transfer
//! hands it the final byte count over a oneshot channel when done.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::paths;
use crate::show::Show;

/// Size discovery gives up after this many HEAD probes.
const SIZE_PROBE_ATTEMPTS: usize = 5;

/// Filename the cover image is stored under, next to the audio file.
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Poll interval of the cover download's progress reporter.
pub const COVER_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to create output directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

#[derive(Debug, Clone, Default)]
pub struct Downloader {
    http: Client,
}

impl Downloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `url` into `out_dir/file_name` and return the local path.
    ///
    /// Repeated invocations are safe and cheap: if the file already exists
    /// the download is skipped without any network request. `progress`
    /// enables the background reporter with the given poll interval.
    pub async fn download(
        &self,
        url: &str,
        out_dir: &Path,
        file_name: &str,
        progress: Option<Duration>,
    ) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| DownloadError::CreateDir {
                dir: out_dir.to_path_buf(),
                source,
            })?;

        let path = out_dir.join(file_name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            info!("{} already exists, skipping download", path.display());
            return Ok(path);
        }

        info!("downloading {file_name}");
        let expected = self.probe_content_length(url).await;
        let start = Instant::now();

        let mut file =
            tokio::fs::File::create(&path)
                .await
                .map_err(|source| DownloadError::CreateFile {
                    path: path.clone(),
                    source,
                })?;

        let mut done_tx = None;
        let mut reporter = None;
        if let Some(poll_interval) = progress {
            let (tx, rx) = oneshot::channel();
            done_tx = Some(tx);
            reporter = Some(tokio::spawn(report_progress(
                path.clone(),
                expected,
                poll_interval,
                rx,
            )));
        }

        let outcome = self.transfer(url, &mut file, &path).await;

        // Stop the reporter before touching the file again: a send hands it
        // the real byte count, a dropped sender tells it the transfer died.
        match &outcome {
            Ok(written) => {
                if let Some(tx) = done_tx.take() {
                    let _ = tx.send(*written);
                }
            }
            Err(_) => drop(done_tx.take()),
        }
        if let Some(handle) = reporter {
            let _ = handle.await;
        }

        let written = match outcome {
            Ok(written) => written,
            Err(err) => {
                drop(file);
                // A truncated file left behind would pass the existence
                // check on the next run and never be repaired.
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    warn!(
                        "could not remove partial file {}: {remove_err}",
                        path.display()
                    );
                }
                return Err(err);
            }
        };

        info!(
            "download of {file_name} completed in {:.2?} ({written} bytes)",
            start.elapsed()
        );
        Ok(path)
    }

    /// Download the show's cover image next to its audio file.
    ///
    /// Returns `None` without any network request when the show has no
    /// exactly-matching cover variant.
    pub async fn save_cover(
        &self,
        base: &Path,
        show: &Show,
        progress: Option<Duration>,
    ) -> Result<Option<PathBuf>, DownloadError> {
        let Some(url) = show.cover_url() else {
            info!("no qualifying cover variant for {}, skipping image", show.title);
            return Ok(None);
        };

        let out_dir = paths::output_path(base, show);
        let path = self
            .download(url, &out_dir, COVER_FILE_NAME, progress)
            .await?;
        Ok(Some(path))
    }

    /// Discover the expected content length with a bounded number of
    /// header-only probes. Absent, non-numeric, and negative values all
    /// count as a failed attempt; after the last attempt the transfer
    /// proceeds with whatever was learned, possibly nothing.
    async fn probe_content_length(&self, url: &str) -> Option<u64> {
        for attempt in 1..=SIZE_PROBE_ATTEMPTS {
            match self.head_content_length(url).await {
                Some(length) => {
                    debug!("expected file size: {length} bytes");
                    return Some(length);
                }
                None => debug!("size probe {attempt}/{SIZE_PROBE_ATTEMPTS} gave no usable length"),
            }
        }
        warn!("no content length for {url} after {SIZE_PROBE_ATTEMPTS} probes");
        None
    }

    async fn head_content_length(&self, url: &str) -> Option<u64> {
        let response = self.http.head(url).send().await.ok()?;
        let raw = response.headers().get(CONTENT_LENGTH)?.to_str().ok()?;
        let length = raw.trim().parse::<i64>().ok()?;
        u64::try_from(length).ok()
    }

    async fn transfer(
        &self,
        url: &str,
        file: &mut tokio::fs::File,
        path: &Path,
    ) -> Result<u64, DownloadError> {
        let transport = |source| DownloadError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;
            file.write_all(&chunk)
                .await
                .map_err(|source| DownloadError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|source| DownloadError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(written)
    }
}

/// Background progress reporter.
///
/// Polls the destination file's size until the transfer signals completion
/// with the real byte count. Shares nothing with the transfer beyond the
/// path: it stats metadata while the transfer appends, and never holds a
/// handle of its own.
async fn report_progress(
    path: PathBuf,
    expected: Option<u64>,
    poll_interval: Duration,
    mut done: oneshot::Receiver<u64>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            outcome = &mut done => {
                if let Ok(written) = outcome {
                    info!("transfer complete ({written} bytes)");
                }
                // A dropped sender means the transfer failed; nothing left
                // to report either way.
                return;
            }
            _ = ticker.tick() => {
                // A just-created file reads as size 1 so the first tick
                // doesn't divide zero by zero.
                let size = tokio::fs::metadata(&path)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0)
                    .max(1);
                info!("{}", format_progress(size, expected));
            }
        }
    }
}

fn format_progress(size: u64, expected: Option<u64>) -> String {
    match expected {
        Some(total) if total > 0 => {
            let percent = (size as f64 / total as f64 * 100.0).round().min(100.0);
            format!("{percent:.0}%")
        }
        // Size discovery came up empty; a ratio would be meaningless.
        _ => format!("{size} bytes"),
    }
}

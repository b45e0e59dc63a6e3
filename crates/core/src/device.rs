//! Device-side collaborators: picking images, saving a local copy, sharing.
//!
//! Local and `file://` images are copied; `http(s)://` images are fetched.
//!
//! These are one-shot operations outside the catalog. Failures are reported
//! to the caller and never touch catalog or favorites state.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::file_name_of;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("walltastic/", env!("CARGO_PKG_VERSION"));

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "heif", "tif", "tiff", "avif",
];

/// Source of image URIs chosen by the user. An empty result means the user cancelled.
pub trait MediaPicker {
    fn pick(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Produces a local file for an image URI.
pub trait Downloader {
    fn download(&self, uri: &str) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Hands a local file to the platform share sheet (or equivalent).
pub trait Sharer {
    fn share(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// `file://` URI for an absolute local path.
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

pub fn is_remote(uri: &str) -> bool {
    let lower = uri.get(..8).unwrap_or(uri).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Local path behind a `file://` URI or a bare path. Other schemes are unsupported.
pub fn local_path(uri: &str) -> Result<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if uri.contains("://") {
        return Err(Error::UnsupportedUri(uri.to_string()));
    }
    Ok(PathBuf::from(uri))
}

/// Picks the given files, and every image file found under the given directories.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }
}

impl MediaPicker for PathPicker {
    fn pick(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        let paths = self.paths.clone();
        async move { tokio::task::spawn_blocking(move || collect_image_uris(&paths)).await? }
    }
}

/// Walk `paths` and return `file://` URIs in a stable order.
///
/// Explicit files are taken as-is; directories contribute image files only.
pub fn collect_image_uris(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut uris = Vec::new();
    for path in paths {
        let canonical = path.canonicalize()?;
        if canonical.is_dir() {
            for entry in WalkDir::new(&canonical).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_image_path(entry.path()) {
                    uris.push(file_uri(entry.path()));
                }
            }
        } else {
            uris.push(file_uri(&canonical));
        }
    }
    debug!(count = uris.len(), "picked images");
    Ok(uris)
}

/// Saves images into a download directory, named after the URI's last segment.
///
/// Local files are copied, remote ones are streamed over HTTP(S).
#[derive(Debug, Clone)]
pub struct FsDownloader {
    dir: PathBuf,
    client: Option<reqwest::Client>,
}

impl FsDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            client: None,
        }
    }

    /// Use `client` for remote images instead of building one per download.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for FsDownloader {
    fn download(&self, uri: &str) -> impl Future<Output = Result<PathBuf>> + Send {
        let uri = uri.to_string();
        let dir = self.dir.clone();
        let client = self.client.clone();
        async move {
            let target = dir.join(file_name_of(&uri));
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| download_failed(&uri, e))?;

            if is_remote(&uri) {
                let client = match client {
                    Some(client) => client,
                    None => build_client().map_err(|e| download_failed(&uri, e))?,
                };
                let bytes = fetch(&client, &uri, &target).await?;
                info!(uri = %uri, target = %target.display(), bytes, "image downloaded");
                return Ok(target);
            }

            let source = local_path(&uri)?;
            let source = tokio::fs::canonicalize(&source)
                .await
                .map_err(|e| download_failed(&uri, e))?;
            if tokio::fs::canonicalize(&target).await.ok().as_ref() == Some(&source) {
                return Ok(target);
            }
            tokio::fs::copy(&source, &target)
                .await
                .map_err(|e| download_failed(&uri, e))?;
            info!(uri = %uri, target = %target.display(), "image downloaded");
            Ok(target)
        }
    }
}

fn download_failed(uri: &str, err: impl std::fmt::Display) -> Error {
    Error::DownloadFailed {
        uri: uri.to_string(),
        message: err.to_string(),
    }
}

fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
}

/// Stream `uri` into `target`. A partial file is removed on failure.
async fn fetch(client: &reqwest::Client, uri: &str, target: &Path) -> Result<u64> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|e| download_failed(uri, e))?;
    if !response.status().is_success() {
        return Err(download_failed(
            uri,
            format!("HTTP status: {}", response.status()),
        ));
    }

    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| download_failed(uri, e))?;
    let mut stream = response.bytes_stream();
    let streamed: std::result::Result<u64, String> = async {
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| e.to_string())?;
            file.write_all(&chunk).await.map_err(|e| e.to_string())?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| e.to_string())?;
        Ok(written)
    }
    .await;

    match streamed {
        Ok(written) => {
            debug!(uri, bytes = written, "stream complete");
            Ok(written)
        }
        Err(message) => {
            drop(file);
            if let Err(e) = tokio::fs::remove_file(target).await {
                debug!(target = %target.display(), error = %e, "partial download not removed");
            }
            Err(download_failed(uri, message))
        }
    }
}

//! Model weights download and management.
//!
//! Resolves a hub model id to a local GGML weights file, downloading it on
//! first use. Files land under `<models_dir>/<sanitized id>/<file>` so
//! several models can coexist.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Default host serving model repository files.
pub const DEFAULT_HUB_BASE: &str = "https://huggingface.co";

/// Manages model weight downloads and storage.
pub struct ModelManager {
    models_dir: PathBuf,
    hub_base: String,
}

impl ModelManager {
    /// Create a manager storing weights under the given directory.
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            hub_base: DEFAULT_HUB_BASE.to_string(),
        }
    }

    /// Override the hub host (used in tests).
    pub fn with_hub_base(mut self, hub_base: impl Into<String>) -> Self {
        self.hub_base = hub_base.into();
        self
    }

    /// Get the models directory path.
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Local path a model file resolves to.
    pub fn local_path(&self, model_id: &str, file: &str) -> PathBuf {
        self.models_dir.join(model_id.replace('/', "__")).join(file)
    }

    /// Ensure a model file is available locally, downloading if necessary.
    ///
    /// Returns the path to the weights file.
    pub async fn ensure_model(&self, model_id: &str, file: &str) -> Result<PathBuf> {
        let model_path = self.local_path(model_id, file);

        if model_path.exists() {
            if self.size_matches(&model_path).await? {
                debug!(path = %model_path.display(), "Model file already exists");
                return Ok(model_path);
            }
            warn!(
                path = %model_path.display(),
                "Cached model file does not match its recorded size, re-downloading"
            );
            fs::remove_file(&model_path)
                .await
                .context("Failed to remove stale model file")?;
        }

        self.download_model(model_id, file, &model_path).await?;
        Ok(model_path)
    }

    /// Check a cached file against the size recorded when it was downloaded.
    ///
    /// Files placed manually carry no size marker and are accepted as-is.
    async fn size_matches(&self, path: &Path) -> Result<bool> {
        let marker = size_marker(path);
        let Ok(recorded) = fs::read_to_string(&marker).await else {
            return Ok(true);
        };
        let expected: u64 = recorded
            .trim()
            .parse()
            .with_context(|| format!("Corrupt size marker: {}", marker.display()))?;
        let actual = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat model file: {}", path.display()))?
            .len();
        Ok(actual == expected)
    }

    /// Download a model file from the hub.
    async fn download_model(&self, model_id: &str, file: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create models directory")?;
        }

        let url = format!("{}/{model_id}/resolve/main/{file}", self.hub_base);
        info!(
            url = %url,
            dest = %dest.display(),
            "Downloading model weights"
        );

        let response = reqwest::get(&url)
            .await
            .with_context(|| format!("Failed to download model from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download model {model_id}: HTTP {}", response.status());
        }

        let announced_len = response.content_length();
        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        if let Some(expected) = announced_len
            && bytes.len() as u64 != expected
        {
            anyhow::bail!(
                "Model download for {model_id} truncated: got {} bytes, expected {expected}",
                bytes.len()
            );
        }

        // Write to temporary file first, then rename (atomic)
        let temp_path = dest.with_extension("tmp");
        let mut out = fs::File::create(&temp_path)
            .await
            .context("Failed to create temporary model file")?;
        out.write_all(&bytes)
            .await
            .context("Failed to write model file")?;
        out.sync_all().await.context("Failed to sync model file")?;

        fs::rename(&temp_path, dest)
            .await
            .context("Failed to finalize model file")?;
        fs::write(size_marker(dest), bytes.len().to_string())
            .await
            .context("Failed to record model file size")?;

        info!(
            path = %dest.display(),
            size = bytes.len(),
            "Model weights downloaded"
        );

        Ok(())
    }
}

/// Sidecar path recording the byte size of a downloaded weights file.
fn size_marker(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".size");
    PathBuf::from(os)
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

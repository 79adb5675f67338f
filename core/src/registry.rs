//! Model hub registry client.
//!
//! Queries the hub listing API for models carrying the ASR pipeline tag and
//! parses entries into typed descriptors. Tag formats on the hub are
//! heterogeneous, so the raw entry → descriptor conversion is fallible and
//! callers decide whether to skip.

use crate::error::{BenchError, BenchResult};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::debug;

/// A model registry entry as returned by the hub listing API.
///
/// The hub omits fields freely; everything is optional here and conversion
/// into a [`ModelDescriptor`] is where requirements are enforced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "modelId")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pipeline_tag: Option<String>,
}

impl RawModel {
    /// Convert into a typed descriptor.
    ///
    /// Declared languages are the entry's tags intersected with
    /// `known_codes` (with an optional `language:` prefix stripped). An
    /// entry without an id, or with no recognizable language tags, is a
    /// recoverable [`BenchError::MetadataMissing`].
    pub fn into_descriptor(
        self,
        known_codes: &BTreeSet<String>,
        default_task: &str,
    ) -> BenchResult<ModelDescriptor> {
        let model_id = self
            .model_id
            .or(self.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| BenchError::MetadataMissing {
                model: "<missing id>".to_string(),
            })?;

        let declared_languages: BTreeSet<String> = self
            .tags
            .iter()
            .map(|tag| tag.strip_prefix("language:").unwrap_or(tag))
            .filter(|tag| known_codes.contains(*tag))
            .map(str::to_string)
            .collect();

        if declared_languages.is_empty() {
            return Err(BenchError::MetadataMissing { model: model_id });
        }

        let task_tag = self
            .pipeline_tag
            .unwrap_or_else(|| default_task.to_string());

        Ok(ModelDescriptor {
            model_id,
            declared_languages,
            task_tag,
        })
    }
}

/// Language-support metadata for one hub model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub model_id: String,
    pub declared_languages: BTreeSet<String>,
    pub task_tag: String,
}

impl ModelDescriptor {
    /// Merge another descriptor for the same model, unioning languages.
    pub fn merge(&mut self, other: ModelDescriptor) {
        debug_assert_eq!(self.model_id, other.model_id);
        self.declared_languages.extend(other.declared_languages);
    }

    /// Whether the model declares any of the given codes.
    pub fn declares_any(&self, codes: &[String]) -> bool {
        codes.iter().any(|c| self.declared_languages.contains(c))
    }
}

/// HTTP client for the model hub API.
pub struct HubClient {
    http: reqwest::Client,
    api_base: String,
}

impl HubClient {
    /// Create a client against the given API base URL.
    pub fn new(api_base: impl Into<String>) -> BenchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sautibench/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    /// List models for a task and language code.
    pub async fn list_models(
        &self,
        task: &str,
        language: &str,
        limit: u32,
    ) -> BenchResult<Vec<RawModel>> {
        let url = format!(
            "{}/models?pipeline_tag={task}&language={language}&limit={limit}",
            self.api_base
        );
        debug!(url = %url, "Querying registry");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let models: Vec<RawModel> = response.json().await?;

        debug!(language = language, count = models.len(), "Registry listing received");
        Ok(models)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

//! Support matrix scraper.
//!
//! Queries the registry once per configured language code, merges listings
//! by model id so each model contributes a single descriptor, and assembles
//! the rectangular support matrix. Malformed entries are skipped with a
//! warning; a failed query for one code does not fail the run.

use crate::config::{Config, Language};
use crate::error::{BenchError, BenchResult};
use crate::matrix::SupportMatrix;
use crate::registry::{HubClient, ModelDescriptor};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Scrapes the registry into a support matrix.
pub struct Scraper {
    client: HubClient,
    languages: Vec<Language>,
    known_codes: BTreeSet<String>,
    task: String,
    limit: u32,
}

impl Scraper {
    /// Create a scraper from the run configuration.
    pub fn new(config: &Config) -> BenchResult<Self> {
        Ok(Self {
            client: HubClient::new(config.scrape.api_base.clone())?,
            languages: config.languages.clone(),
            known_codes: config.all_language_codes(),
            task: config.scrape.task.clone(),
            limit: config.scrape.limit,
        })
    }

    /// Query the registry and collect one descriptor per unique model.
    pub async fn fetch_descriptors(&self) -> BenchResult<BTreeMap<String, ModelDescriptor>> {
        let mut descriptors: BTreeMap<String, ModelDescriptor> = BTreeMap::new();

        for language in &self.languages {
            for code in &language.codes {
                let listing = match self.client.list_models(&self.task, code, self.limit).await {
                    Ok(listing) => listing,
                    Err(err) => {
                        warn!(
                            language = %language.name,
                            code = %code,
                            error = %err,
                            "Registry query failed, continuing with remaining codes"
                        );
                        continue;
                    }
                };

                for raw in listing {
                    match raw.into_descriptor(&self.known_codes, &self.task) {
                        Ok(descriptor) => merge_descriptor(&mut descriptors, descriptor),
                        Err(err @ BenchError::MetadataMissing { .. }) => {
                            warn!(error = %err, "Skipping model with unusable metadata");
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        info!(models = descriptors.len(), "Collected unique model descriptors");
        Ok(descriptors)
    }

    /// Build the full support matrix.
    pub async fn build_matrix(&self) -> BenchResult<SupportMatrix> {
        let descriptors = self.fetch_descriptors().await?;
        Ok(assemble_matrix(&self.languages, descriptors.into_values()))
    }
}

/// Merge a descriptor into the per-model map, unioning declared languages.
pub fn merge_descriptor(
    descriptors: &mut BTreeMap<String, ModelDescriptor>,
    descriptor: ModelDescriptor,
) {
    match descriptors.get_mut(&descriptor.model_id) {
        Some(existing) => existing.merge(descriptor),
        None => {
            descriptors.insert(descriptor.model_id.clone(), descriptor);
        }
    }
}

/// Assemble the rectangular matrix: languages as rows, models as columns,
/// a cell is supported iff the model declares any of the language's codes.
pub fn assemble_matrix(
    languages: &[Language],
    descriptors: impl IntoIterator<Item = ModelDescriptor>,
) -> SupportMatrix {
    let descriptors: Vec<ModelDescriptor> = descriptors.into_iter().collect();

    let language_names: Vec<String> = languages.iter().map(|l| l.name.clone()).collect();
    let mut model_ids: Vec<String> = descriptors.iter().map(|d| d.model_id.clone()).collect();
    model_ids.sort();

    let mut matrix = SupportMatrix::new(language_names, model_ids);
    for language in languages {
        for descriptor in &descriptors {
            if descriptor.declares_any(&language.codes) {
                matrix.mark_supported(&language.name, &descriptor.model_id);
            }
        }
    }

    matrix
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;

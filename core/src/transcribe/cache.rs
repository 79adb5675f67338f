//! Model cache with explicit lifecycle.
//!
//! The evaluation loop loads each model once before its language loop and
//! releases it after the last language, so at most one heavyweight model is
//! resident at a time. The cache is keyed by hub model id.

use super::Transcriber;
use anyhow::Result;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Creates transcribers by hub model id.
pub trait TranscriberFactory {
    fn create(&self, model_id: &str) -> Result<Box<dyn Transcriber>>;
}

/// Cache of loaded transcribers, keyed by model id.
pub struct ModelCache {
    factory: Box<dyn TranscriberFactory>,
    loaded: HashMap<String, Box<dyn Transcriber>>,
}

impl ModelCache {
    pub fn new(factory: Box<dyn TranscriberFactory>) -> Self {
        Self {
            factory,
            loaded: HashMap::new(),
        }
    }

    /// Get the transcriber for a model, loading it on first use.
    pub fn load(&mut self, model_id: &str) -> Result<&mut dyn Transcriber> {
        let transcriber = match self.loaded.entry(model_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(model = model_id, "Loading model into cache");
                entry.insert(self.factory.create(model_id)?)
            }
        };
        Ok(transcriber.as_mut())
    }

    /// Drop a loaded model, freeing its weights.
    pub fn release(&mut self, model_id: &str) {
        if self.loaded.remove(model_id).is_some() {
            debug!(model = model_id, "Released model from cache");
        }
    }

    /// Number of currently loaded models.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct NullTranscriber;

    impl Transcriber for NullTranscriber {
        fn transcribe(
            &mut self,
            _audio: &[f32],
            _sample_rate: u32,
            _language: Option<&str>,
        ) -> Result<String> {
            Ok(String::new())
        }
    }

    struct CountingFactory {
        creates: Rc<Cell<usize>>,
    }

    impl TranscriberFactory for CountingFactory {
        fn create(&self, model_id: &str) -> Result<Box<dyn Transcriber>> {
            if model_id == "broken/model" {
                anyhow::bail!("weights corrupt");
            }
            self.creates.set(self.creates.get() + 1);
            Ok(Box::new(NullTranscriber))
        }
    }

    fn cache_with_counter() -> (ModelCache, Rc<Cell<usize>>) {
        let creates = Rc::new(Cell::new(0));
        let cache = ModelCache::new(Box::new(CountingFactory {
            creates: creates.clone(),
        }));
        (cache, creates)
    }

    #[test]
    fn test_load_creates_once_per_model() {
        let (mut cache, creates) = cache_with_counter();

        cache.load("a/one").unwrap();
        cache.load("a/one").unwrap();
        cache.load("b/two").unwrap();

        assert_eq!(creates.get(), 2);
        assert_eq!(cache.loaded_count(), 2);
    }

    #[test]
    fn test_release_frees_and_reload_recreates() {
        let (mut cache, creates) = cache_with_counter();

        cache.load("a/one").unwrap();
        cache.release("a/one");
        assert_eq!(cache.loaded_count(), 0);

        cache.load("a/one").unwrap();
        assert_eq!(creates.get(), 2);
    }

    #[test]
    fn test_release_unknown_model_is_noop() {
        let (mut cache, _) = cache_with_counter();
        cache.release("never/loaded");
        assert_eq!(cache.loaded_count(), 0);
    }

    #[test]
    fn test_factory_error_propagates_and_caches_nothing() {
        let (mut cache, _) = cache_with_counter();

        assert!(cache.load("broken/model").is_err());
        assert_eq!(cache.loaded_count(), 0);
    }
}

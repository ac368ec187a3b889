use crate::error::ClassifierError;
use crate::http::interface::HttpClient;
use crate::image_classifier::interface::{ImageModel, ModelDecoder};
use crate::library::logger::interface::Logger;
use crate::model_loader::metadata::LabelMetadata;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn ImageModel + Send + Sync>,
    pub metadata: Option<LabelMetadata>,
}

/// Loads the remote model and its label metadata at most once per successful load.
///
/// The cache lock is held for the whole load, so concurrent callers wait for
/// the first load instead of fetching again.
pub struct ModelLoader {
    http_client: Arc<dyn HttpClient + Send + Sync>,
    model_decoder: Arc<dyn ModelDecoder + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
    cache: Mutex<Option<LoadedModel>>,
}

impl ModelLoader {
    pub fn new(
        http_client: Arc<dyn HttpClient + Send + Sync>,
        model_decoder: Arc<dyn ModelDecoder + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            http_client,
            model_decoder,
            logger: logger.with_namespace("model_loader"),
            cache: Mutex::new(None),
        }
    }

    pub fn ensure_model(
        &self,
        model_url: &str,
        metadata_url: Option<&str>,
    ) -> Result<LoadedModel, ClassifierError> {
        // The cache is only written after a successful load, so a poisoned
        // lock still holds `None` and the next caller retries.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(loaded) = cache.as_ref() {
            return Ok(loaded.clone());
        }

        let loaded = self.load(model_url, metadata_url).inspect_err(|e| {
            let _ = self.logger.error(&e.to_string());
        })?;
        *cache = Some(loaded.clone());

        Ok(loaded)
    }

    pub fn cached_metadata(&self) -> Option<LabelMetadata> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|loaded| loaded.metadata.clone())
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn load(
        &self,
        model_url: &str,
        metadata_url: Option<&str>,
    ) -> Result<LoadedModel, ClassifierError> {
        if model_url.is_empty() {
            return Err(ClassifierError::Load("no model url configured".to_string()));
        }

        let _ = self.logger.info(&format!("Loading model from {}", model_url));
        let model = self.fetch_model(model_url)?;

        let metadata = metadata_url
            .filter(|url| !url.is_empty())
            .and_then(|url| self.fetch_metadata(url));

        let _ = self.logger.info(&format!(
            "Model ready ({})",
            match metadata.as_ref().and_then(LabelMetadata::label_count) {
                Some(count) => format!("{} labels", count),
                None => "no labels".to_string(),
            }
        ));

        Ok(LoadedModel { model, metadata })
    }

    fn fetch_model(
        &self,
        model_url: &str,
    ) -> Result<Arc<dyn ImageModel + Send + Sync>, ClassifierError> {
        let response = self
            .http_client
            .get(model_url)
            .map_err(|e| ClassifierError::Load(format!("{}: {}", model_url, e)))?;

        if !response.is_ok() {
            return Err(ClassifierError::Load(format!(
                "{}: HTTP {}",
                model_url, response.status
            )));
        }

        self.model_decoder
            .decode(&response.body)
            .map_err(|e| ClassifierError::Load(format!("{}: {}", model_url, e)))
    }

    /// Metadata problems only degrade labels; they never fail the load.
    fn fetch_metadata(&self, metadata_url: &str) -> Option<LabelMetadata> {
        let response = match self.http_client.get(metadata_url) {
            Ok(response) => response,
            Err(e) => {
                let _ = self
                    .logger
                    .info(&format!("Metadata unavailable ({}): {}", metadata_url, e));
                return None;
            }
        };

        if !response.is_ok() {
            let _ = self.logger.info(&format!(
                "Metadata unavailable ({}): HTTP {}",
                metadata_url, response.status
            ));
            return None;
        }

        match LabelMetadata::from_json_slice(&response.body) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                let _ = self
                    .logger
                    .info(&format!("Metadata unreadable ({}): {}", metadata_url, e));
                None
            }
        }
    }
}

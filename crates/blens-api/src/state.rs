//! Application state.

use std::sync::Arc;

use blens_classifier::ClassifierClient;
use blens_imaging::{ImageFetcher, Normalizer};
use blens_models::BreedCatalog;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything here is read-only per request; concurrency needs no
/// synchronization beyond the token cache inside the classifier client.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub fetcher: Arc<ImageFetcher>,
    pub normalizer: Arc<Normalizer>,
    pub classifier: Arc<ClassifierClient>,
    pub catalog: Arc<BreedCatalog>,
}

impl AppState {
    /// Create application state from the environment.
    ///
    /// Fails fast on missing classifier endpoint or credentials, before
    /// the server starts accepting requests.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let fetcher = ImageFetcher::from_env()?;
        let normalizer = Normalizer::from_env();
        let classifier = ClassifierClient::from_env()?;
        let catalog = BreedCatalog::from_env()?;

        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
            normalizer: Arc::new(normalizer),
            classifier: Arc::new(classifier),
            catalog: Arc::new(catalog),
        })
    }
}

//! Process-wide resources: the dataset and model are loaded on first access
//! and shared read-only afterwards, next to the per-session state store.

use crate::{
    config::ServerConfig,
    dataset::{load_dataset, Dataset},
    error::AppError,
    model::{load_model, ModelBundle},
    session::SessionStore,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct AppContext {
    config: ServerConfig,
    dataset: OnceCell<Arc<Dataset>>,
    model: OnceCell<Arc<ModelBundle>>,
    pub sessions: SessionStore,
}

fn session_store(config: &ServerConfig) -> SessionStore {
    match config.session_ttl() {
        Some(ttl) => SessionStore::with_ttl(ttl),
        None => SessionStore::new(),
    }
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: session_store(&config),
            config,
            dataset: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// Context with resources already in place, bypassing the files.
    pub fn with_resources(config: ServerConfig, dataset: Dataset, model: ModelBundle) -> Self {
        Self {
            sessions: session_store(&config),
            config,
            dataset: OnceCell::new_with(Some(Arc::new(dataset))),
            model: OnceCell::new_with(Some(Arc::new(model))),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn dataset(&self) -> Result<Arc<Dataset>, AppError> {
        self.dataset
            .get_or_try_init(|| async {
                let path = self.config.dataset_path.clone();
                let ds = tokio::task::spawn_blocking(move || load_dataset(path))
                    .await
                    .map_err(|e| AppError::Join(e.to_string()))??;
                tracing::info!(
                    "loaded dataset {} ({} records)",
                    self.config.dataset_path.display(),
                    ds.len()
                );
                Ok::<_, AppError>(Arc::new(ds))
            })
            .await
            .cloned()
    }

    pub async fn model(&self) -> Result<Arc<ModelBundle>, AppError> {
        self.model
            .get_or_try_init(|| async {
                let path = self.config.model_path.clone();
                let mdl = tokio::task::spawn_blocking(move || load_model(path))
                    .await
                    .map_err(|e| AppError::Join(e.to_string()))??;
                tracing::info!(
                    "loaded model {} [{}]; feature_names[{}]: {:?}",
                    self.config.model_path.display(),
                    mdl.describe(),
                    mdl.feature_names().len(),
                    mdl.feature_names()
                );
                Ok::<_, AppError>(Arc::new(mdl))
            })
            .await
            .cloned()
    }
}

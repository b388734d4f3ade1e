use super::*;
use mlh_core::Feature;
use mlh_core::Label;
use mlh_data::Catalog;
use mlh_models::Estimator;
use mlh_models::ModelError;
use mlh_models::Params;
use mlh_models::Registry;
use mlh_models::Trainer;
use mlh_models::TrainingSet;
use mlh_store::Artifact;
use mlh_store::Metadata;
use mlh_store::Store;
use mlh_store::StoreError;
use std::sync::Arc;

/// Where training data comes from: posted rows or a catalog name.
pub enum Input {
    Inline(TrainingSet),
    Dataset(String),
}

impl Input {
    /// Inline data wins when both are present.
    pub fn from_request(data: Option<Data>, dataset: Option<String>) -> Result<Self, HubError> {
        match (data, dataset) {
            (Some(data), _) => Ok(Self::Inline(TrainingSet::try_from(data)?)),
            (None, Some(name)) => Ok(Self::Dataset(name)),
            (None, None) => Err(HubError::Missing("data")),
        }
    }
}

/// Shared handle to the trainer and the artifact store.
///
/// Built once at start-up and handed to every request.
#[derive(Clone)]
pub struct Hub {
    trainer: Trainer,
    store: Store,
}

impl Hub {
    pub fn new(trainer: Trainer, store: Store) -> Self {
        Self { trainer, store }
    }

    /// Store from `STORE_*`, dataset catalog from `DATASET_DIR`.
    pub async fn from_env() -> Result<Self, StoreError> {
        let store = Store::from_env().await?;
        let trainer = Trainer::with_source(Arc::new(Catalog::from_env()));
        Ok(Self::new(trainer, store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    pub fn available(&self) -> Vec<&'static str> {
        Registry::available()
    }

    pub async fn stored(&self) -> Result<Vec<String>, HubError> {
        Ok(self.store.list().await?)
    }

    pub async fn describe(&self, id: &str) -> Result<Metadata, HubError> {
        self.store
            .metadata(id)
            .await?
            .ok_or_else(|| HubError::NotFound(id.to_string()))
    }

    /// Fit `model_type` and store it under its own identifier.
    pub async fn train(
        &self,
        model_type: &str,
        input: Input,
        params: Params,
    ) -> Result<Metadata, HubError> {
        let artifact = self.fit(model_type, model_type, input, params).await?;
        self.store.save(model_type, &artifact).await?;
        Ok(artifact.meta)
    }

    /// Refit a stored model with its stored type, replacing it. Stored
    /// parameters are reused when none are given.
    pub async fn retrain(
        &self,
        id: &str,
        input: Input,
        params: Params,
    ) -> Result<Metadata, HubError> {
        let previous = self.describe(id).await?;
        let params = if params.is_empty() { previous.params } else { params };
        let artifact = self.fit(previous.kind.name(), id, input, params).await?;
        self.store.save(id, &artifact).await?;
        Ok(artifact.meta)
    }

    pub async fn predict(&self, id: &str, rows: Vec<Vec<Feature>>) -> Result<Vec<Label>, HubError> {
        let artifact = self
            .store
            .load(id)
            .await?
            .ok_or_else(|| HubError::NotFound(id.to_string()))?;
        Ok(artifact.body.predict(&rows)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), HubError> {
        match self.store.delete(id).await? {
            true => Ok(()),
            false => Err(HubError::NotFound(id.to_string())),
        }
    }

    /// Write a training set into the dataset catalog.
    pub async fn import(&self, name: &str, set: TrainingSet) -> Result<usize, HubError> {
        let source = self
            .trainer
            .source()
            .cloned()
            .ok_or_else(|| ModelError::Dataset("no dataset catalog configured".to_string()))?;
        let name = name.to_string();
        let rows = set.rows();
        web::block(move || source.save(&name, &set)).await??;
        Ok(rows)
    }

    pub async fn health(&self) -> Result<(), HubError> {
        Ok(self.store.ping().await?)
    }

    /// Fitting is CPU-bound, so it runs on the blocking pool.
    async fn fit(
        &self,
        model_type: &str,
        name: &str,
        input: Input,
        params: Params,
    ) -> Result<Artifact, HubError> {
        Registry::resolve(model_type)?;
        Store::key(name)?;
        let trainer = self.trainer.clone();
        let model_type = model_type.to_string();
        let name = name.to_string();
        web::block(move || {
            let fitted = match input {
                Input::Inline(set) => trainer.fit(&model_type, Some(set), None, &params)?,
                Input::Dataset(dataset) => trainer.fit(&model_type, None, Some(&dataset), &params)?,
            };
            Artifact::seal(&name, fitted).map_err(HubError::from)
        })
        .await?
    }
}

use super::*;
use mlh_core::Probability;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// A fitted model with the facts of its training run.
#[derive(Debug, Clone)]
pub struct Fitted {
    pub model: Model,
    pub rows: usize,
    /// Accuracy on the training set itself.
    pub accuracy: Probability,
    pub elapsed: Duration,
}

/// Resolves a model identifier, obtains data, validates parameters and fits.
///
/// Cheap to clone; the optional dataset source is shared.
#[derive(Clone, Default)]
pub struct Trainer {
    source: Option<Arc<dyn Source>>,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_source(source: Arc<dyn Source>) -> Self {
        Self {
            source: Some(source),
        }
    }
    pub fn source(&self) -> Option<&Arc<dyn Source>> {
        self.source.as_ref()
    }

    /// Train one model. An inline `set` wins over a named `dataset`.
    pub fn train(
        &self,
        name: &str,
        set: Option<TrainingSet>,
        dataset: Option<&str>,
        params: &Params,
    ) -> Result<Model, ModelError> {
        self.fit(name, set, dataset, params).map(|fitted| fitted.model)
    }

    /// As [`Trainer::train`], keeping row count, accuracy and timing.
    pub fn fit(
        &self,
        name: &str,
        set: Option<TrainingSet>,
        dataset: Option<&str>,
        params: &Params,
    ) -> Result<Fitted, ModelError> {
        let (kind, construct) = Registry::resolve(name)?;
        let ref set = match set {
            Some(set) => set,
            None => self.dataset(dataset)?,
        };
        let learner = construct(params)?;
        log::info!(
            "training {} on {} rows x {} features",
            kind,
            set.rows(),
            set.width()
        );
        let start = Instant::now();
        let model = learner.fit(set)?;
        let elapsed = start.elapsed();
        let accuracy = model.score(set)?;
        log::info!(
            "trained {} in {:.2?} (training accuracy {:.4})",
            kind,
            elapsed,
            accuracy
        );
        Ok(Fitted {
            model,
            rows: set.rows(),
            accuracy,
            elapsed,
        })
    }

    fn dataset(&self, name: Option<&str>) -> Result<TrainingSet, ModelError> {
        let name = name.ok_or_else(|| ModelError::Dataset("no data or dataset given".to_string()))?;
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ModelError::Dataset("no dataset catalog configured".to_string()))?;
        source.load(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Fixture(Mutex<BTreeMap<String, TrainingSet>>);

    impl Source for Fixture {
        fn load(&self, name: &str) -> Result<TrainingSet, ModelError> {
            self.0
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| ModelError::Dataset(name.to_string()))
        }
        fn save(&self, name: &str, set: &TrainingSet) -> Result<(), ModelError> {
            self.0.lock().unwrap().insert(name.to_string(), set.clone());
            Ok(())
        }
        fn names(&self) -> Result<Vec<String>, ModelError> {
            Ok(self.0.lock().unwrap().keys().cloned().collect())
        }
    }

    fn iris() -> TrainingSet {
        TrainingSet::new(
            vec![
                vec![5.1, 3.5, 1.4, 0.2],
                vec![4.9, 3.0, 1.4, 0.2],
                vec![7.0, 3.2, 4.7, 1.4],
                vec![6.4, 3.2, 4.5, 1.5],
            ],
            vec![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn trains_each_registered_model() {
        let trainer = Trainer::new();
        for name in Registry::available() {
            let model = trainer.train(name, Some(iris()), None, &Params::new()).unwrap();
            assert_eq!(model.kind().name(), name);
            assert_eq!(model.predict(&[vec![5.5, 3.0, 1.5, 0.3]]).unwrap().len(), 1);
        }
    }

    #[test]
    fn iris_forest_scenario() {
        let params = Params::new().with("n_estimators", 10);
        let model = Trainer::new()
            .train("forest", Some(iris()), None, &params)
            .unwrap();
        let labels = model.predict(&[vec![5.5, 3.0, 1.5, 0.3]]).unwrap();
        assert!(labels == vec![0] || labels == vec![1]);
        assert_eq!(model.params().integer("n_estimators"), Ok(Some(10)));
    }

    #[test]
    fn unknown_model_is_rejected_before_data() {
        assert!(matches!(
            Trainer::new().train("svm", None, None, &Params::new()),
            Err(ModelError::UnknownModelType(_))
        ));
    }

    #[test]
    fn named_dataset_needs_a_source() {
        assert!(matches!(
            Trainer::new().train("forest", None, Some("iris"), &Params::new()),
            Err(ModelError::Dataset(_))
        ));
        assert!(matches!(
            Trainer::new().train("forest", None, None, &Params::new()),
            Err(ModelError::Dataset(_))
        ));
    }

    #[test]
    fn named_dataset_is_loaded_from_source() {
        let source = Arc::new(Fixture::default());
        source.save("iris", &iris()).unwrap();
        let trainer = Trainer::with_source(source);
        let model = trainer
            .train("logreg", None, Some("iris"), &Params::new())
            .unwrap();
        assert_eq!(model.kind(), ModelType::Logreg);
        assert!(matches!(
            trainer.train("logreg", None, Some("wine"), &Params::new()),
            Err(ModelError::Dataset(_))
        ));
    }

    #[test]
    fn fit_reports_training_run() {
        let fitted = Trainer::new()
            .fit("forest", Some(iris()), None, &Params::new().with("n_estimators", 5))
            .unwrap();
        assert_eq!(fitted.rows, 4);
        assert!((0.0..=1.0).contains(&fitted.accuracy));
    }

    #[test]
    fn invalid_params_surface() {
        let params = Params::new().with("max_iter", 0);
        assert!(matches!(
            Trainer::new().train("logreg", Some(iris()), None, &params),
            Err(ModelError::InvalidParameter { .. })
        ));
    }
}

use super::*;
use mlh_core::Feature;
use mlh_core::Label;
use mlh_core::Probability;

/// A fitted estimator of any registered kind.
///
/// Serializes as `{"kind": "...", "model": {...}}` so the stored body names
/// its own type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "lowercase")]
pub enum Model {
    Forest(Forest),
    Logreg(Logistic),
}

impl Model {
    pub fn kind(&self) -> ModelType {
        match self {
            Self::Forest(_) => ModelType::Forest,
            Self::Logreg(_) => ModelType::Logreg,
        }
    }
    /// Parameters the model was actually fit with, defaults filled in.
    pub fn params(&self) -> Params {
        match self {
            Self::Forest(m) => m.params().params(),
            Self::Logreg(m) => m.params().params(),
        }
    }
    fn estimator(&self) -> &dyn Estimator {
        match self {
            Self::Forest(m) => m,
            Self::Logreg(m) => m,
        }
    }
}

impl Estimator for Model {
    fn classes(&self) -> &[Label] {
        self.estimator().classes()
    }
    fn width(&self) -> usize {
        self.estimator().width()
    }
    fn proba(&self, row: &[Feature]) -> Vec<Probability> {
        self.estimator().proba(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn fitted() -> Vec<Model> {
        let forest = ForestParams {
            n_estimators: 10,
            random_state: Some(1),
            ..ForestParams::default()
        };
        vec![
            forest.fit(&iris()).unwrap(),
            LogregParams::default().fit(&iris()).unwrap(),
        ]
    }

    #[test]
    fn serialization_preserves_predictions() {
        let ref probes = vec![
            vec![5.5, 3.0, 1.5, 0.3],
            vec![6.0, 3.1, 3.0, 0.9],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        for model in fitted() {
            let json = serde_json::to_string(&model).unwrap();
            let back = serde_json::from_str::<Model>(&json).unwrap();
            assert_eq!(back, model);
            assert_eq!(back.predict(probes).unwrap(), model.predict(probes).unwrap());
            assert_eq!(
                back.predict_proba(probes).unwrap(),
                model.predict_proba(probes).unwrap()
            );
        }
    }

    #[test]
    fn body_is_tagged_with_kind() {
        for model in fitted() {
            let value = serde_json::to_value(&model).unwrap();
            assert_eq!(value["kind"], model.kind().name());
            assert!(value["model"].is_object());
        }
    }

    #[test]
    fn delegates_to_estimator() {
        for model in fitted() {
            assert_eq!(model.classes(), &[0, 1]);
            assert_eq!(model.width(), 4);
            assert_eq!(model.predict(iris().x()).unwrap().len(), 4);
            assert!(model.params().keys().all(|k| model.kind().allowed().contains(&k)));
        }
    }
}

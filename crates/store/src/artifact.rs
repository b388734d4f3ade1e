use super::*;
use mlh_core::ID;
use mlh_core::Label;
use mlh_core::Probability;
use mlh_core::Unique;
use mlh_models::Estimator;
use mlh_models::Fitted;
use mlh_models::Model;
use mlh_models::ModelType;
use mlh_models::Params;
use sha2::Digest;

/// Facts recorded about a fitted model when it is stored.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metadata {
    pub name: String,
    pub kind: ModelType,
    /// Effective parameters, defaults filled in.
    pub params: Params,
    pub revision: ID<Artifact>,
    /// Unix seconds.
    pub trained_at: u64,
    pub width: usize,
    pub classes: Vec<Label>,
    pub rows: usize,
    /// Accuracy on the training set itself.
    pub accuracy: Probability,
    /// Hex SHA-256 of the serialized model.
    pub checksum: String,
}

/// What gets written to the bucket: the model plus its metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Artifact {
    pub meta: Metadata,
    pub body: Model,
}

impl Artifact {
    /// Describe a freshly fitted model, stamping a new revision and checksum.
    pub fn seal(name: &str, fitted: Fitted) -> Result<Self, StoreError> {
        let Fitted {
            model: body,
            rows,
            accuracy,
            ..
        } = fitted;
        let meta = Metadata {
            name: name.to_string(),
            kind: body.kind(),
            params: body.params(),
            revision: ID::default(),
            trained_at: mlh_core::now(),
            width: body.width(),
            classes: body.classes().to_vec(),
            rows,
            accuracy,
            checksum: checksum(&body)?,
        };
        Ok(Self { meta, body })
    }

    /// Recompute the body checksum and compare with the recorded one.
    pub fn verify(&self) -> Result<(), StoreError> {
        let actual = checksum(&self.body)?;
        if actual == self.meta.checksum {
            Ok(())
        } else {
            Err(StoreError::Corrupt(format!(
                "{} checksum {} does not match recorded {}",
                self.meta.name, actual, self.meta.checksum
            )))
        }
    }
}

impl Unique for Artifact {
    fn id(&self) -> ID<Self> {
        self.meta.revision
    }
}

fn checksum(body: &Model) -> Result<String, StoreError> {
    serde_json::to_vec(body)
        .map(|bytes| hex::encode(sha2::Sha256::digest(&bytes)))
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlh_models::Trainer;
    use mlh_models::TrainingSet;

    fn sealed() -> Artifact {
        let set = TrainingSet::new(
            vec![vec![0.0, 1.0], vec![0.1, 0.9], vec![1.0, 0.0], vec![0.9, 0.2]],
            vec![3, 3, 5, 5],
        )
        .unwrap();
        let params = Params::new().with("n_estimators", 5).with("random_state", 1);
        let fitted = Trainer::new()
            .fit("forest", Some(set), None, &params)
            .unwrap();
        Artifact::seal("forest", fitted).unwrap()
    }

    #[test]
    fn metadata_describes_the_model() {
        let artifact = sealed();
        assert_eq!(artifact.meta.kind, ModelType::Forest);
        assert_eq!(artifact.meta.classes, vec![3, 5]);
        assert_eq!(artifact.meta.width, 2);
        assert_eq!(artifact.meta.rows, 4);
        assert_eq!(artifact.meta.checksum.len(), 64);
        assert_eq!(artifact.meta.params.integer("n_estimators"), Ok(Some(5)));
        assert_eq!(artifact.id(), artifact.meta.revision);
        assert!((0.0..=1.0).contains(&artifact.meta.accuracy));
    }

    #[test]
    fn checksum_survives_serialization() {
        let artifact = sealed();
        let bytes = serde_json::to_vec(&artifact).unwrap();
        let back = serde_json::from_slice::<Artifact>(&bytes).unwrap();
        assert_eq!(back, artifact);
        assert!(back.verify().is_ok());
    }

    #[test]
    fn tampering_is_detected() {
        let mut artifact = sealed();
        artifact.meta.checksum = "0".repeat(64);
        assert!(matches!(artifact.verify(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn revisions_are_fresh() {
        assert_ne!(sealed().meta.revision, sealed().meta.revision);
    }
}

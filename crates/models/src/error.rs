/// Errors raised while resolving, configuring, fitting, or applying a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Identifier outside the registry.
    UnknownModelType(String),
    /// Row count, row width, or label count disagree.
    ShapeMismatch(String),
    /// An allowed parameter carried an unusable value.
    InvalidParameter { key: String, reason: String },
    /// Training data that no estimator can fit.
    InvalidData(String),
    /// A named dataset could not be produced.
    Dataset(String),
}

impl ModelError {
    pub fn parameter(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownModelType(s) => write!(f, "unknown model type: {}", s),
            Self::ShapeMismatch(s) => write!(f, "shape mismatch: {}", s),
            Self::InvalidParameter { key, reason } => {
                write!(f, "invalid parameter {}: {}", key, reason)
            }
            Self::InvalidData(s) => write!(f, "invalid training data: {}", s),
            Self::Dataset(s) => write!(f, "dataset unavailable: {}", s),
        }
    }
}

impl std::error::Error for ModelError {}

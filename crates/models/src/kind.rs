use super::*;

/// The kinds of classifier this service knows how to train.
///
/// The string identifiers double as storage keys: training a `forest`
/// persists the artifact under the name `forest`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Forest,
    Logreg,
}

impl ModelType {
    pub const fn all() -> [Self; 2] {
        [Self::Forest, Self::Logreg]
    }
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Forest => "forest",
            Self::Logreg => "logreg",
        }
    }
    /// Parameter names forwarded to the learner; everything else is dropped.
    pub const fn allowed(&self) -> &'static [&'static str] {
        match self {
            Self::Forest => ForestParams::ALLOWED,
            Self::Logreg => LogregParams::ALLOWED,
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for ModelType {
    type Error = ModelError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ModelError::UnknownModelType(s.to_string()))
    }
}

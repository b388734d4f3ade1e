use super::*;

/// A named collection of training sets the trainer can draw from.
pub trait Source: Send + Sync {
    fn load(&self, name: &str) -> Result<TrainingSet, ModelError>;
    fn save(&self, name: &str, set: &TrainingSet) -> Result<(), ModelError>;
    /// Dataset names currently available, ascending.
    fn names(&self) -> Result<Vec<String>, ModelError>;
}

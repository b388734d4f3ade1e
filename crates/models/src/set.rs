use super::*;
use mlh_core::Feature;
use mlh_core::Label;

/// A feature matrix paired with its label vector.
///
/// Construction is the only validation point: once built, every row has the
/// same non-zero width, every value is finite, and there is exactly one
/// label per row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrainingSet {
    x: Vec<Vec<Feature>>,
    y: Vec<Label>,
}

impl TrainingSet {
    pub fn new(x: Vec<Vec<Feature>>, y: Vec<Label>) -> Result<Self, ModelError> {
        if x.len() != y.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(ModelError::InvalidData("no rows".to_string()));
        }
        let width = x[0].len();
        if width == 0 {
            return Err(ModelError::ShapeMismatch("rows have no features".to_string()));
        }
        if let Some(i) = x.iter().position(|row| row.len() != width) {
            return Err(ModelError::ShapeMismatch(format!(
                "row {} has {} features, expected {}",
                i,
                x[i].len(),
                width
            )));
        }
        if x.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData("non-finite feature value".to_string()));
        }
        Ok(Self { x, y })
    }
    pub fn x(&self) -> &[Vec<Feature>] {
        &self.x
    }
    pub fn y(&self) -> &[Label] {
        &self.y
    }
    pub fn rows(&self) -> usize {
        self.y.len()
    }
    pub fn width(&self) -> usize {
        self.x[0].len()
    }
    /// Distinct labels, ascending.
    pub fn classes(&self) -> Vec<Label> {
        let mut classes = self.y.clone();
        classes.sort_unstable();
        classes.dedup();
        classes
    }
    /// Labels re-expressed as positions into [`TrainingSet::classes`].
    pub fn encoded(&self, classes: &[Label]) -> Vec<usize> {
        self.y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect()
    }
}

/// Reject prediction rows whose width differs from what the model was fit on.
pub fn check_width(rows: &[Vec<Feature>], width: usize) -> Result<(), ModelError> {
    match rows.iter().position(|row| row.len() != width) {
        None => Ok(()),
        Some(i) => Err(ModelError::ShapeMismatch(format!(
            "row {} has {} features, model expects {}",
            i,
            rows[i].len(),
            width
        ))),
    }
}

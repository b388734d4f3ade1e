use super::*;
use mlh_core::Feature;
use mlh_core::Label;
use mlh_core::Probability;

/// A configured, untrained model: validated hyperparameters ready to fit.
pub trait Learner: Send + Sync {
    fn kind(&self) -> ModelType;
    fn fit(&self, set: &TrainingSet) -> Result<Model, ModelError>;
}

/// A fitted classifier.
pub trait Estimator {
    /// Class labels seen during fitting, ascending.
    fn classes(&self) -> &[Label];
    /// Number of features each input row must carry.
    fn width(&self) -> usize;
    /// Class probabilities for one row, aligned with [`Estimator::classes`].
    /// The row width is assumed checked.
    fn proba(&self, row: &[Feature]) -> Vec<Probability>;

    /// One label per input row.
    fn predict(&self, rows: &[Vec<Feature>]) -> Result<Vec<Label>, ModelError> {
        check_width(rows, self.width())?;
        Ok(rows
            .iter()
            .map(|row| self.proba(row))
            .map(|p| argmax(&p))
            .map(|i| self.classes()[i])
            .collect())
    }
    /// Class probabilities per input row.
    fn predict_proba(&self, rows: &[Vec<Feature>]) -> Result<Vec<Vec<Probability>>, ModelError> {
        check_width(rows, self.width())?;
        Ok(rows.iter().map(|row| self.proba(row)).collect())
    }
    /// Fraction of rows whose predicted label matches.
    fn score(&self, set: &TrainingSet) -> Result<Probability, ModelError> {
        let hits = self
            .predict(set.x())?
            .iter()
            .zip(set.y())
            .filter(|(a, b)| a == b)
            .count();
        Ok(hits as Probability / set.rows() as Probability)
    }
}

/// Index of the largest value; ties go to the lowest index.
pub fn argmax(values: &[Probability]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, Probability::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max { (i, v) } else { (best, max) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), 2);
        assert_eq!(argmax(&[0.3, 0.4, 0.3]), 1);
    }
}

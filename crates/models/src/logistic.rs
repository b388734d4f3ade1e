use super::*;
use mlh_core::Feature;
use mlh_core::LOGREG_C;
use mlh_core::LOGREG_ITER_LIMIT;
use mlh_core::LOGREG_MAX_ITER;
use mlh_core::LOGREG_TOL;
use mlh_core::Label;
use mlh_core::Probability;

/// Validated logistic regression hyperparameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogregParams {
    /// Inverse L2 regularization strength.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub fit_intercept: bool,
}

impl LogregParams {
    pub const ALLOWED: &'static [&'static str] = &["C", "max_iter", "tol", "fit_intercept"];

    /// The effective configuration, in request form.
    pub fn params(&self) -> Params {
        Params::new()
            .with("C", self.c)
            .with("max_iter", self.max_iter)
            .with("tol", self.tol)
            .with("fit_intercept", self.fit_intercept)
    }
}

impl Default for LogregParams {
    fn default() -> Self {
        Self {
            c: LOGREG_C,
            max_iter: LOGREG_MAX_ITER,
            tol: LOGREG_TOL,
            fit_intercept: true,
        }
    }
}

impl TryFrom<&Params> for LogregParams {
    type Error = ModelError;
    fn try_from(params: &Params) -> Result<Self, Self::Error> {
        let ref params = params.retain(Self::ALLOWED);
        let defaults = Self::default();
        Ok(Self {
            c: params.positive("C")?.unwrap_or(defaults.c),
            max_iter: params
                .bounded("max_iter", 1, LOGREG_ITER_LIMIT)?
                .unwrap_or(defaults.max_iter),
            tol: params.positive("tol")?.unwrap_or(defaults.tol),
            fit_intercept: params
                .boolean("fit_intercept")?
                .unwrap_or(defaults.fit_intercept),
        })
    }
}

impl Learner for LogregParams {
    fn kind(&self) -> ModelType {
        ModelType::Logreg
    }
    fn fit(&self, set: &TrainingSet) -> Result<Model, ModelError> {
        Logistic::fit(self.clone(), set).map(Model::Logreg)
    }
}

/// Multinomial (softmax) logistic regression.
///
/// Inputs are standardized with the training mean and deviation before the
/// linear map; both are stored so prediction applies the same transform.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Logistic {
    params: LogregParams,
    classes: Vec<Label>,
    mean: Vec<Feature>,
    scale: Vec<Feature>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    iterations: usize,
}

impl Logistic {
    /// Full-batch gradient descent on mean cross-entropy plus
    /// `‖W‖² / (2·C·n)`, stepping by the inverse Lipschitz bound of the loss.
    pub fn fit(params: LogregParams, set: &TrainingSet) -> Result<Self, ModelError> {
        let classes = set.classes();
        if classes.len() < 2 {
            return Err(ModelError::InvalidData(format!(
                "logistic regression needs samples of at least 2 classes, got {:?}",
                classes
            )));
        }
        let k = classes.len();
        let d = set.width();
        let n = set.rows() as f64;
        let ref y = set.encoded(&classes);
        let (mean, scale) = moments(set.x());
        let ref z = set
            .x()
            .iter()
            .map(|row| standardize(row, &mean, &scale))
            .collect::<Vec<_>>();
        let lambda = 1.0 / (params.c * n);
        let norm = z
            .iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>())
            .sum::<f64>()
            / n;
        let intercept = if params.fit_intercept { 1.0 } else { 0.0 };
        let step = 1.0 / (0.5 * (norm + intercept) + lambda);
        let mut weights = vec![vec![0.0; d]; k];
        let mut bias = vec![0.0; k];
        let mut iterations = params.max_iter;
        for iteration in 0..params.max_iter {
            let mut gw = vec![vec![0.0; d]; k];
            let mut gb = vec![0.0; k];
            for (row, &target) in z.iter().zip(y.iter()) {
                let p = softmax(&logits(&weights, &bias, row));
                for c in 0..k {
                    let e = p[c] - if c == target { 1.0 } else { 0.0 };
                    gb[c] += e;
                    gw[c].iter_mut().zip(row).for_each(|(g, x)| *g += e * x);
                }
            }
            for c in 0..k {
                gw[c]
                    .iter_mut()
                    .zip(weights[c].iter())
                    .for_each(|(g, w)| *g = *g / n + lambda * w);
                gb[c] = if params.fit_intercept { gb[c] / n } else { 0.0 };
            }
            let largest = gw
                .iter()
                .flatten()
                .chain(gb.iter())
                .fold(0.0f64, |m, g| m.max(g.abs()));
            if largest < params.tol {
                iterations = iteration;
                break;
            }
            for c in 0..k {
                weights[c]
                    .iter_mut()
                    .zip(gw[c].iter())
                    .for_each(|(w, g)| *w -= step * g);
                bias[c] -= step * gb[c];
            }
        }
        if iterations == params.max_iter {
            log::warn!(
                "logistic regression did not converge in {} iterations",
                params.max_iter
            );
        }
        Ok(Self {
            params,
            classes,
            mean,
            scale,
            weights,
            bias,
            iterations,
        })
    }
    pub fn params(&self) -> &LogregParams {
        &self.params
    }
    /// Gradient steps taken before convergence or `max_iter`.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Estimator for Logistic {
    fn classes(&self) -> &[Label] {
        &self.classes
    }
    fn width(&self) -> usize {
        self.mean.len()
    }
    fn proba(&self, row: &[Feature]) -> Vec<Probability> {
        softmax(&logits(
            &self.weights,
            &self.bias,
            &standardize(row, &self.mean, &self.scale),
        ))
    }
}

/// Column means and standard deviations; constant columns get unit scale.
fn moments(x: &[Vec<Feature>]) -> (Vec<Feature>, Vec<Feature>) {
    let n = x.len() as f64;
    let d = x[0].len();
    let mean = (0..d)
        .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect::<Vec<_>>();
    let scale = (0..d)
        .map(|j| x.iter().map(|row| (row[j] - mean[j]).powi(2)).sum::<f64>() / n)
        .map(f64::sqrt)
        .map(|s| if s > f64::EPSILON { s } else { 1.0 })
        .collect::<Vec<_>>();
    (mean, scale)
}

fn standardize(row: &[Feature], mean: &[Feature], scale: &[Feature]) -> Vec<Feature> {
    row.iter()
        .zip(mean)
        .zip(scale)
        .map(|((x, m), s)| (x - m) / s)
        .collect()
}

fn logits(weights: &[Vec<f64>], bias: &[f64], row: &[Feature]) -> Vec<f64> {
    weights
        .iter()
        .zip(bias)
        .map(|(w, b)| b + w.iter().zip(row).map(|(w, x)| w * x).sum::<f64>())
        .collect()
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<Probability> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.iter().map(|l| (l - max).exp()).collect::<Vec<_>>();
    let sum = exps.iter().sum::<f64>();
    exps.into_iter().map(|e| e / sum).collect()
}

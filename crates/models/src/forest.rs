use super::*;
use mlh_core::FOREST_MAX_ESTIMATORS;
use mlh_core::FOREST_MIN_SAMPLES_LEAF;
use mlh_core::FOREST_MIN_SAMPLES_SPLIT;
use mlh_core::FOREST_N_ESTIMATORS;
use mlh_core::Feature;
use mlh_core::Label;
use mlh_core::Probability;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use serde_json::Value;

/// Odd multiplier spreading tree indices across the seed space.
const SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// How many candidate features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    Count(usize),
    Fraction(f64),
    All,
}

impl MaxFeatures {
    /// Concrete feature count for a given input width, at least one.
    pub fn resolve(&self, width: usize) -> usize {
        let w = width as f64;
        let n = match self {
            Self::Sqrt => w.sqrt().floor() as usize,
            Self::Log2 => w.log2().floor() as usize,
            Self::Count(c) => *c,
            Self::Fraction(f) => (f * w).floor() as usize,
            Self::All => width,
        };
        n.clamp(1, width.max(1))
    }

    fn parse(key: &str, value: Option<&Value>) -> Result<Self, ModelError> {
        match value {
            None => Ok(Self::Sqrt),
            Some(Value::Null) => Ok(Self::All),
            Some(Value::String(s)) => match s.trim() {
                "sqrt" | "auto" => Ok(Self::Sqrt),
                "log2" => Ok(Self::Log2),
                other => match (other.parse::<u64>(), other.parse::<f64>()) {
                    (Ok(c), _) => Self::parse(key, Some(&Value::from(c))),
                    (_, Ok(f)) => Self::parse(key, Some(&Value::from(f))),
                    _ => Err(ModelError::parameter(key, format!("unrecognized {:?}", s))),
                },
            },
            Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
                (Some(0), _) => Err(ModelError::parameter(key, "must be at least 1")),
                (Some(c), _) => Ok(Self::Count(c as usize)),
                (None, Some(f)) if f > 0.0 && f <= 1.0 => Ok(Self::Fraction(f)),
                _ => Err(ModelError::parameter(
                    key,
                    format!("expected count or fraction in (0, 1], got {}", n),
                )),
            },
            Some(other) => Err(ModelError::parameter(key, format!("unrecognized {}", other))),
        }
    }

    fn value(&self) -> Value {
        match self {
            Self::Sqrt => Value::from("sqrt"),
            Self::Log2 => Value::from("log2"),
            Self::Count(c) => Value::from(*c),
            Self::Fraction(f) => Value::from(*f),
            Self::All => Value::Null,
        }
    }
}

/// Validated random forest hyperparameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub random_state: Option<u64>,
}

impl ForestParams {
    pub const ALLOWED: &'static [&'static str] = &[
        "n_estimators",
        "max_depth",
        "min_samples_split",
        "min_samples_leaf",
        "max_features",
        "bootstrap",
        "random_state",
    ];

    /// The effective configuration, in request form.
    pub fn params(&self) -> Params {
        Params::new()
            .with("n_estimators", self.n_estimators)
            .with("max_depth", self.max_depth)
            .with("min_samples_split", self.min_samples_split)
            .with("min_samples_leaf", self.min_samples_leaf)
            .with("max_features", self.max_features.value())
            .with("bootstrap", self.bootstrap)
            .with("random_state", self.random_state)
    }
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: FOREST_N_ESTIMATORS,
            max_depth: None,
            min_samples_split: FOREST_MIN_SAMPLES_SPLIT,
            min_samples_leaf: FOREST_MIN_SAMPLES_LEAF,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            random_state: None,
        }
    }
}

impl TryFrom<&Params> for ForestParams {
    type Error = ModelError;
    fn try_from(params: &Params) -> Result<Self, Self::Error> {
        let ref params = params.retain(Self::ALLOWED);
        let defaults = Self::default();
        Ok(Self {
            n_estimators: params
                .bounded("n_estimators", 1, FOREST_MAX_ESTIMATORS)?
                .unwrap_or(defaults.n_estimators),
            max_depth: params.count("max_depth", 1)?,
            min_samples_split: params
                .count("min_samples_split", 2)?
                .unwrap_or(defaults.min_samples_split),
            min_samples_leaf: params
                .count("min_samples_leaf", 1)?
                .unwrap_or(defaults.min_samples_leaf),
            max_features: MaxFeatures::parse("max_features", params.raw("max_features"))?,
            bootstrap: params.boolean("bootstrap")?.unwrap_or(defaults.bootstrap),
            random_state: params.seed("random_state")?,
        })
    }
}

impl Learner for ForestParams {
    fn kind(&self) -> ModelType {
        ModelType::Forest
    }
    fn fit(&self, set: &TrainingSet) -> Result<Model, ModelError> {
        Ok(Model::Forest(Forest::fit(self.clone(), set)))
    }
}

/// Bagged ensemble of CART trees.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Forest {
    params: ForestParams,
    classes: Vec<Label>,
    width: usize,
    trees: Vec<Tree>,
}

impl Forest {
    /// Grow `n_estimators` trees in parallel. Each tree draws from its own
    /// generator derived from `random_state`, so a fixed seed reproduces the
    /// same forest regardless of thread scheduling.
    pub fn fit(params: ForestParams, set: &TrainingSet) -> Self {
        let classes = set.classes();
        let ref y = set.encoded(&classes);
        let k = classes.len();
        let n = set.rows();
        let ref growth = Growth {
            max_depth: params.max_depth,
            min_split: params.min_samples_split,
            min_leaf: params.min_samples_leaf,
            max_features: params.max_features.resolve(set.width()),
        };
        let seed = params.random_state.unwrap_or_else(rand::random);
        let bootstrap = params.bootstrap;
        let trees = (0..params.n_estimators)
            .into_par_iter()
            .map(|t| {
                let ref mut rng = SmallRng::seed_from_u64(seed ^ (t as u64).wrapping_mul(SPREAD));
                let samples: Vec<usize> = match bootstrap {
                    true => (0..n).map(|_| rng.random_range(0..n)).collect(),
                    false => (0..n).collect(),
                };
                Tree::grow(set.x(), y, k, samples, growth, rng)
            })
            .collect::<Vec<_>>();
        log::debug!(
            "grew {} trees (max depth {})",
            trees.len(),
            trees.iter().map(Tree::depth).max().unwrap_or_default()
        );
        Self {
            params,
            width: set.width(),
            classes,
            trees,
        }
    }
    pub fn params(&self) -> &ForestParams {
        &self.params
    }
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

impl Estimator for Forest {
    fn classes(&self) -> &[Label] {
        &self.classes
    }
    fn width(&self) -> usize {
        self.width
    }
    /// Mean of the per-tree leaf probabilities.
    fn proba(&self, row: &[Feature]) -> Vec<Probability> {
        let n = self.trees.len() as Probability;
        self.trees
            .iter()
            .map(|tree| tree.proba(row))
            .fold(vec![0.0; self.classes.len()], |mut acc, p| {
                acc.iter_mut().zip(p).for_each(|(a, b)| *a += b);
                acc
            })
            .into_iter()
            .map(|p| p / n)
            .collect()
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

    #[test]
    fn defaults_when_empty() {
        let params = ForestParams::try_from(&Params::new()).unwrap();
        assert_eq!(params, ForestParams::default());
    }

    #[test]
    fn unknown_keys_are_dropped_bad_values_rejected() {
        let ok = Params::new().with("n_estimators", 10).with("criterion", "gini");
        assert_eq!(ForestParams::try_from(&ok).unwrap().n_estimators, 10);
        let bad = Params::new().with("n_estimators", 0);
        assert!(matches!(
            ForestParams::try_from(&bad),
            Err(ModelError::InvalidParameter { .. })
        ));
        let bad = Params::new().with("max_features", "cube");
        assert!(ForestParams::try_from(&bad).is_err());
        let bad = Params::new().with("min_samples_split", 1);
        assert!(ForestParams::try_from(&bad).is_err());
    }

    #[test]
    fn huge_ensembles_are_refused_before_fitting() {
        for n in [Value::from(1_000_000_000_000i64), Value::from(1e300)] {
            assert!(matches!(
                ForestParams::try_from(&Params::new().with("n_estimators", n)),
                Err(ModelError::InvalidParameter { .. })
            ));
        }
        let most = Params::new().with("n_estimators", FOREST_MAX_ESTIMATORS);
        assert_eq!(
            ForestParams::try_from(&most).unwrap().n_estimators,
            FOREST_MAX_ESTIMATORS
        );
    }

    #[test]
    fn large_seeds_are_kept_exactly() {
        let params = Params::new().with("random_state", u64::MAX);
        assert_eq!(
            ForestParams::try_from(&params).unwrap().random_state,
            Some(u64::MAX)
        );
    }

    #[test]
    fn max_features_forms() {
        let parse = |v: Value| {
            ForestParams::try_from(&Params::new().with("max_features", v))
                .map(|p| p.max_features)
        };
        assert_eq!(parse(Value::from("log2")), Ok(MaxFeatures::Log2));
        assert_eq!(parse(Value::from(3)), Ok(MaxFeatures::Count(3)));
        assert_eq!(parse(Value::from(0.5)), Ok(MaxFeatures::Fraction(0.5)));
        assert_eq!(parse(Value::Null), Ok(MaxFeatures::All));
        assert_eq!(parse(Value::from("2")), Ok(MaxFeatures::Count(2)));
        assert!(parse(Value::from(1.5)).is_err());
        assert_eq!(MaxFeatures::Sqrt.resolve(4), 2);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
        assert_eq!(MaxFeatures::Count(10).resolve(4), 4);
        assert_eq!(MaxFeatures::Fraction(0.1).resolve(4), 1);
    }

    #[test]
    fn iris_sample_predicts_a_seen_label() {
        let params = ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        };
        let forest = Forest::fit(params, &iris());
        assert_eq!(forest.trees().len(), 10);
        let labels = forest.predict(&[vec![5.5, 3.0, 1.5, 0.3]]).unwrap();
        assert_eq!(labels.len(), 1);
        assert!([0, 1].contains(&labels[0]));
    }

    #[test]
    fn separable_points_are_recovered() {
        let params = ForestParams {
            n_estimators: 25,
            bootstrap: false,
            max_features: MaxFeatures::All,
            random_state: Some(3),
            ..ForestParams::default()
        };
        let forest = Forest::fit(params, &iris());
        assert_eq!(forest.score(&iris()).unwrap(), 1.0);
        let proba = forest.predict_proba(&[vec![7.0, 3.2, 4.7, 1.4]]).unwrap();
        assert!((proba[0].iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seeded_fits_are_reproducible() {
        let params = ForestParams {
            n_estimators: 8,
            random_state: Some(42),
            ..ForestParams::default()
        };
        let a = Forest::fit(params.clone(), &iris());
        let b = Forest::fit(params, &iris());
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_width_is_a_shape_mismatch() {
        let forest = Forest::fit(ForestParams::default(), &iris());
        assert!(matches!(
            forest.predict(&[vec![1.0, 2.0]]),
            Err(ModelError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn effective_params_roundtrip() {
        let params = ForestParams {
            n_estimators: 7,
            max_depth: Some(3),
            max_features: MaxFeatures::Log2,
            random_state: Some(9),
            ..ForestParams::default()
        };
        assert_eq!(ForestParams::try_from(&params.params()), Ok(params));
    }
}

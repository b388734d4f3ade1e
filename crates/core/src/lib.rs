//! Core type aliases, traits, and constants for mlhub.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the mlhub workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// A single numeric feature value in a training or prediction row.
pub type Feature = f64;
/// Class label predicted by a classifier.
pub type Label = i64;
/// Class membership probabilities and impurity measures.
pub type Probability = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

/// Fresh time-ordered (v7) identifier.
impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

/// Seconds since the unix epoch.
pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// ============================================================================
// RANDOM FOREST DEFAULTS
// Mirrors the familiar scikit-learn defaults so request payloads carry over.
// ============================================================================
/// Number of trees grown when `n_estimators` is not given.
pub const FOREST_N_ESTIMATORS: usize = 100;
/// Largest `n_estimators` a request may ask for.
pub const FOREST_MAX_ESTIMATORS: usize = 10_000;
/// Minimum samples required to split an internal node.
pub const FOREST_MIN_SAMPLES_SPLIT: usize = 2;
/// Minimum samples required at each leaf.
pub const FOREST_MIN_SAMPLES_LEAF: usize = 1;
/// Impurity decrease below which a split is not worth taking.
pub const FOREST_MIN_IMPURITY_DECREASE: Probability = 1e-12;

// ============================================================================
// LOGISTIC REGRESSION DEFAULTS
// ============================================================================
/// Inverse L2 regularization strength.
pub const LOGREG_C: f64 = 1.0;
/// Gradient descent steps when `max_iter` is not given.
pub const LOGREG_MAX_ITER: usize = 100;
/// Largest `max_iter` a request may ask for.
pub const LOGREG_ITER_LIMIT: usize = 1_000_000;
/// Stop once the largest absolute gradient component falls below this.
pub const LOGREG_TOL: f64 = 1e-4;

// ============================================================================
// STORAGE
// ============================================================================
/// Default bucket (table or directory) holding model artifacts.
pub const STORE_BUCKET: &str = "models";
/// Default directory for the local filesystem bucket.
pub const STORE_PATH: &str = "artifacts";
/// Suffix appended to a model name to form its object key.
pub const STORE_SUFFIX: &str = ".json";
/// Attempts made to reach the backing store at start-up.
pub const STORE_CONNECT_ATTEMPTS: usize = 5;
/// Pause between start-up connection attempts.
pub const STORE_CONNECT_BACKOFF: std::time::Duration = std::time::Duration::from_secs(2);
/// Default directory holding CSV datasets.
pub const DATASET_DIR: &str = "datasets";

// ============================================================================
// SERVER
// ============================================================================
/// Default listen address for the REST server.
pub const BIND_ADDR: &str = "0.0.0.0:8000";
/// HTTP worker threads.
pub const SERVER_WORKERS: usize = 4;
/// Lifetime of an issued access token.
pub const ACCESS_TOKEN_DURATION: std::time::Duration = std::time::Duration::from_secs(60 * 60);
/// Subject written into tokens issued without credentials.
pub const ANONYMOUS_SUBJECT: &str = "user";
/// Signing secret used when `JWT_SECRET` is unset. Development only.
pub const DEV_SECRET: &str = "default-dev-key";

// ============================================================================
// ENVIRONMENT
// ============================================================================
pub mod env {
    pub const BIND_ADDR: &str = "BIND_ADDR";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const API_USERNAME: &str = "API_USERNAME";
    pub const API_HASHWORD: &str = "API_HASHWORD";
    pub const STORE_BACKEND: &str = "STORE_BACKEND";
    pub const STORE_PATH: &str = "STORE_PATH";
    pub const STORE_BUCKET: &str = "STORE_BUCKET";
    pub const DB_URL: &str = "DB_URL";
    pub const DATASET_DIR: &str = "DATASET_DIR";

    /// Read a variable, falling back to `default` when unset or empty.
    pub fn var(key: &str, default: &str) -> String {
        std::env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// A float that is a whole number inside the `i64` range, as that integer.
/// Labels and integer parameters sent as `1.0` go through here.
pub fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < -(i64::MIN as f64)).then(|| f as i64)
}

/// Object and dataset names: non-empty, ASCII alphanumerics, `-` and `_`.
pub fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now())).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_reject_path_tricks() {
        assert!(valid_name("forest"));
        assert!(valid_name("iris_v2-small"));
        assert!(!valid_name(""));
        assert!(!valid_name("../etc/passwd"));
        assert!(!valid_name("a/b"));
        assert!(!valid_name("model.pkl"));
        assert!(!valid_name(&"x".repeat(129)));
    }

    #[test]
    fn integral_floats_only() {
        assert_eq!(integral(1.0), Some(1));
        assert_eq!(integral(-3.0), Some(-3));
        assert_eq!(integral(1.5), None);
        assert_eq!(integral(1e300), None);
        assert_eq!(integral(f64::NAN), None);
    }

    #[test]
    fn ids_are_time_ordered() {
        struct Marker;
        let a = ID::<Marker>::default();
        let b = ID::<Marker>::default();
        assert!(a <= b);
        assert_ne!(a, b);
    }
}

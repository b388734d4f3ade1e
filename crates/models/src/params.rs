use super::*;
use serde_json::Value;
use std::collections::BTreeMap;

/// Loosely typed training parameters as they arrive over the wire.
///
/// Values are scalars (number, string, bool, or null). Typed accessors accept
/// numeric strings as well, since some callers can only send string maps.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
    /// Value as sent, including an explicit null.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Parse a `key=value` pair, reading the value as JSON when it is valid
    /// JSON and as a bare string otherwise.
    pub fn assign(&mut self, pair: &str) -> Result<(), ModelError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ModelError::parameter(pair, "expected key=value"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ModelError::parameter(pair, "empty key"));
        }
        let value = serde_json::from_str::<Value>(value.trim())
            .unwrap_or_else(|_| Value::String(value.trim().to_string()));
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    /// Keep only allow-listed keys. Dropped keys are logged, not rejected.
    pub fn retain(&self, allowed: &[&str]) -> Self {
        self.keys()
            .filter(|key| !allowed.contains(key))
            .for_each(|key| log::warn!("dropping unsupported parameter {}", key));
        self.0
            .iter()
            .filter(|(key, _)| allowed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn integer(&self, key: &str) -> Result<Option<i64>, ModelError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(mlh_core::integral))
                .map(Some)
                .ok_or_else(|| {
                    ModelError::parameter(key, format!("expected 64-bit integer, got {}", n))
                }),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ModelError::parameter(key, format!("expected integer, got {:?}", s))),
            Some(other) => Err(ModelError::parameter(
                key,
                format!("expected integer, got {}", other),
            )),
        }
    }

    pub fn float(&self, key: &str) -> Result<Option<f64>, ModelError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| ModelError::parameter(key, format!("expected number, got {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ModelError::parameter(key, format!("expected number, got {:?}", s))),
            Some(other) => Err(ModelError::parameter(
                key,
                format!("expected number, got {}", other),
            )),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<Option<bool>, ModelError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(ModelError::parameter(key, format!("expected bool, got {:?}", s))),
            },
            Some(other) => Err(ModelError::parameter(
                key,
                format!("expected bool, got {}", other),
            )),
        }
    }

    /// Integer constrained to `>= min`, as a count.
    pub fn count(&self, key: &str, min: usize) -> Result<Option<usize>, ModelError> {
        self.bounded(key, min, usize::MAX)
    }

    /// Integer constrained to `min..=max`, as a count.
    pub fn bounded(&self, key: &str, min: usize, max: usize) -> Result<Option<usize>, ModelError> {
        match self.integer(key)? {
            None => Ok(None),
            Some(n) if n < min as i64 => Err(ModelError::parameter(
                key,
                format!("must be at least {}, got {}", min, n),
            )),
            Some(n) if n as u64 > max as u64 => Err(ModelError::parameter(
                key,
                format!("must be at most {}, got {}", max, n),
            )),
            Some(n) => Ok(Some(n as usize)),
        }
    }

    /// Non-negative integer over the full `u64` range, as a seed.
    pub fn seed(&self, key: &str) -> Result<Option<u64>, ModelError> {
        let unsigned = match self.get(key) {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match unsigned {
            Some(u) => Ok(Some(u)),
            None => match self.integer(key)? {
                None => Ok(None),
                Some(n) if n >= 0 => Ok(Some(n as u64)),
                Some(n) => Err(ModelError::parameter(
                    key,
                    format!("must be non-negative, got {}", n),
                )),
            },
        }
    }

    /// Float constrained to be finite and strictly positive.
    pub fn positive(&self, key: &str) -> Result<Option<f64>, ModelError> {
        match self.float(key)? {
            None => Ok(None),
            Some(x) if x.is_finite() && x > 0.0 => Ok(Some(x)),
            Some(x) => Err(ModelError::parameter(
                key,
                format!("must be positive, got {}", x),
            )),
        }
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Params {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_drops_unknown_keys() {
        let params = Params::new()
            .with("n_estimators", 10)
            .with("criterion", "entropy")
            .with("max_depth", 3);
        let kept = params.retain(&["n_estimators", "max_depth"]);
        assert_eq!(kept.len(), 2);
        assert!(kept.get("criterion").is_none());
    }

    #[test]
    fn integers_accept_strings_and_whole_floats() {
        let params = Params::new()
            .with("a", 10)
            .with("b", "12")
            .with("c", 5.0)
            .with("d", 5.5)
            .with("e", true);
        assert_eq!(params.integer("a"), Ok(Some(10)));
        assert_eq!(params.integer("b"), Ok(Some(12)));
        assert_eq!(params.integer("c"), Ok(Some(5)));
        assert!(params.integer("d").is_err());
        assert!(params.integer("e").is_err());
        assert_eq!(params.integer("missing"), Ok(None));
    }

    #[test]
    fn oversized_numbers_are_rejected_not_saturated() {
        let params = Params::new()
            .with("big", 1e300)
            .with("u", u64::MAX)
            .with("edge", 9.3e18);
        assert!(params.integer("big").is_err());
        assert!(params.integer("u").is_err());
        assert!(params.integer("edge").is_err());
        assert_eq!(params.seed("u"), Ok(Some(u64::MAX)));
        assert!(params.seed("big").is_err());
    }

    #[test]
    fn bounded_counts_have_a_ceiling() {
        let params = Params::new().with("n", 11).with("m", 10);
        assert!(matches!(
            params.bounded("n", 1, 10),
            Err(ModelError::InvalidParameter { .. })
        ));
        assert_eq!(params.bounded("m", 1, 10), Ok(Some(10)));
    }

    #[test]
    fn seeds_reject_negatives() {
        let params = Params::new().with("s", -1).with("t", 7.0).with("v", "12");
        assert!(params.seed("s").is_err());
        assert_eq!(params.seed("t"), Ok(Some(7)));
        assert_eq!(params.seed("v"), Ok(Some(12)));
        assert_eq!(params.seed("missing"), Ok(None));
    }

    #[test]
    fn null_reads_as_absent() {
        let params = Params::new().with("max_depth", Value::Null);
        assert_eq!(params.count("max_depth", 1), Ok(None));
    }

    #[test]
    fn bounds_are_enforced() {
        let params = Params::new().with("n", 0).with("c", -1.0);
        assert!(params.count("n", 1).is_err());
        assert!(params.positive("c").is_err());
    }

    #[test]
    fn assign_parses_json_or_text() {
        let mut params = Params::new();
        params.assign("n_estimators=10").unwrap();
        params.assign("max_features=sqrt").unwrap();
        params.assign("bootstrap=false").unwrap();
        assert_eq!(params.integer("n_estimators"), Ok(Some(10)));
        assert_eq!(params.get("max_features"), Some(&Value::from("sqrt")));
        assert_eq!(params.boolean("bootstrap"), Ok(Some(false)));
        assert!(params.assign("novalue").is_err());
        assert!(params.assign("=3").is_err());
    }
}

use super::*;

/// Builds a validated, untrained learner from request parameters.
pub type Constructor = fn(&Params) -> Result<Box<dyn Learner>, ModelError>;

/// Maps model identifiers to learner constructors.
///
/// The only place the set of trainable models is enumerated; adding a model
/// means adding a [`ModelType`] variant and an arm here.
pub struct Registry;

impl Registry {
    pub fn resolve(name: &str) -> Result<(ModelType, Constructor), ModelError> {
        let kind = ModelType::try_from(name)?;
        Ok((kind, Self::constructor(kind)))
    }
    pub fn constructor(kind: ModelType) -> Constructor {
        match kind {
            ModelType::Forest => forest,
            ModelType::Logreg => logreg,
        }
    }
    pub fn available() -> Vec<&'static str> {
        ModelType::all().iter().map(ModelType::name).collect()
    }
}

fn forest(params: &Params) -> Result<Box<dyn Learner>, ModelError> {
    Ok(Box::new(ForestParams::try_from(params)?))
}

fn logreg(params: &Params) -> Result<Box<dyn Learner>, ModelError> {
    Ok(Box::new(LogregParams::try_from(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_in_stable_order() {
        assert_eq!(Registry::available(), vec!["forest", "logreg"]);
    }

    #[test]
    fn resolves_known_names() {
        for name in Registry::available() {
            let (kind, construct) = Registry::resolve(name).unwrap();
            assert_eq!(kind.name(), name);
            assert_eq!(construct(&Params::new()).unwrap().kind(), kind);
        }
    }

    #[test]
    fn unknown_names_fail() {
        for name in ["svm", "xgboost", "Forest", ""] {
            assert!(matches!(
                Registry::resolve(name),
                Err(ModelError::UnknownModelType(_))
            ));
        }
    }

    #[test]
    fn constructors_validate() {
        let (_, construct) = Registry::resolve("logreg").unwrap();
        assert!(construct(&Params::new().with("C", -1.0)).is_err());
    }
}

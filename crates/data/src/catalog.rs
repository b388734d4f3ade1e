use mlh_models::ModelError;
use mlh_models::Source;
use mlh_models::TrainingSet;
use std::path::Path;
use std::path::PathBuf;

const EXTENSION: &str = "csv";

/// A directory of `{name}.csv` training sets.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    /// Catalog rooted at `DATASET_DIR`.
    pub fn from_env() -> Self {
        Self::new(mlh_core::env::var(
            mlh_core::env::DATASET_DIR,
            mlh_core::DATASET_DIR,
        ))
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    fn path(&self, name: &str) -> Result<PathBuf, ModelError> {
        if mlh_core::valid_name(name) {
            Ok(self.root.join(name).with_extension(EXTENSION))
        } else {
            Err(ModelError::Dataset(format!("invalid dataset name {:?}", name)))
        }
    }
}

impl Source for Catalog {
    fn load(&self, name: &str) -> Result<TrainingSet, ModelError> {
        let path = self.path(name)?;
        let text = std::fs::read_to_string(&path)
            .map_err(|e| ModelError::Dataset(format!("{}: {}", path.display(), e)))?;
        let set = crate::csv::parse(&text)?;
        log::debug!("loaded dataset {} ({} rows)", name, set.rows());
        Ok(set)
    }

    fn save(&self, name: &str, set: &TrainingSet) -> Result<(), ModelError> {
        let path = self.path(name)?;
        std::fs::create_dir_all(&self.root)
            .and_then(|_| std::fs::write(&path, crate::csv::render(set)))
            .map_err(|e| ModelError::Dataset(format!("{}: {}", path.display(), e)))?;
        log::info!("saved dataset {} ({} rows)", name, set.rows());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>, ModelError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(ModelError::Dataset(format!("{}: {}", self.root.display(), e))),
        };
        let mut names = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|name| mlh_core::valid_name(name))
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }
}

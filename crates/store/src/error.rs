/// Failures of the object store. A missing object is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Name that cannot be turned into an object key.
    InvalidName(String),
    /// The bucket could not be reached or refused the operation.
    Unavailable(String),
    /// Stored bytes do not decode or fail their checksum.
    Corrupt(String),
}

impl StoreError {
    pub fn unavailable(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Unavailable(format!("{}: {}", context, err))
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid model name: {:?}", name),
            Self::Unavailable(s) => write!(f, "store unavailable: {}", s),
            Self::Corrupt(s) => write!(f, "corrupt artifact: {}", s),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::unavailable("postgres", err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable("filesystem", err)
    }
}

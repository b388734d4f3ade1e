use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use mlh_models::ModelError;
use mlh_store::StoreError;

/// Everything a request can fail with, mapped onto HTTP statuses.
#[derive(Debug)]
pub enum HubError {
    Model(ModelError),
    Store(StoreError),
    /// No artifact stored under this name.
    NotFound(String),
    /// A required request field was absent.
    Missing(&'static str),
    /// The blocking pool dropped the job.
    Blocking,
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(e) => write!(f, "{}", e),
            Self::Store(e) => write!(f, "{}", e),
            Self::NotFound(_) => write!(f, "Model not found"),
            Self::Missing(field) => write!(f, "missing field {}", field),
            Self::Blocking => write!(f, "training was interrupted"),
        }
    }
}

impl std::error::Error for HubError {}

impl From<ModelError> for HubError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}
impl From<StoreError> for HubError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
impl From<actix_web::error::BlockingError> for HubError {
    fn from(_: actix_web::error::BlockingError) -> Self {
        Self::Blocking
    }
}

impl ResponseError for HubError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Model(_) => StatusCode::BAD_REQUEST,
            Self::Missing(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(StoreError::Corrupt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            status if status.is_server_error() => log::error!("{}", self),
            _ => log::warn!("{}", self),
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "detail": self.to_string() }))
    }
}

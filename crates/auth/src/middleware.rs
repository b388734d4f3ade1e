use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Ready;
use std::future::ready;

/// Extractor for authenticated requests: a valid, unexpired bearer token.
pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
    pub fn subject(&self) -> &str {
        self.0.subject()
    }
}

fn unauthorized(reason: &'static str) -> actix_web::Error {
    actix_web::error::InternalError::from_response(
        reason,
        HttpResponse::Unauthorized()
            .insert_header(("WWW-Authenticate", "Bearer"))
            .json(serde_json::json!({"detail": reason})),
    )
    .into()
}

impl Auth {
    fn check(req: &HttpRequest) -> Result<Self, actix_web::Error> {
        let crypto = req
            .app_data::<web::Data<Crypto>>()
            .ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("token service not configured")
            })?;
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| unauthorized("not authenticated"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("invalid authorization format"))?;
        let claims = crypto
            .decode(token.trim())
            .map_err(|_| unauthorized("invalid token"))?;
        if claims.expired() {
            return Err(unauthorized("token expired"));
        }
        Ok(Self(claims))
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::check(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn request(header: Option<String>) -> HttpRequest {
        let req = TestRequest::default().app_data(web::Data::new(Crypto::new(b"secret")));
        let req = match header {
            Some(value) => req.insert_header(("Authorization", value)),
            None => req,
        };
        req.to_http_request()
    }

    fn status(result: Result<Auth, actix_web::Error>) -> StatusCode {
        result
            .err()
            .map(|e| e.as_response_error().status_code())
            .unwrap_or(StatusCode::OK)
    }

    #[actix_web::test]
    async fn valid_bearer_passes() {
        let token = Crypto::new(b"secret").encode(&Claims::new("user")).unwrap();
        let ref req = request(Some(format!("Bearer {}", token)));
        let auth = Auth::from_request(req, &mut Payload::None).await.unwrap();
        assert_eq!(auth.subject(), "user");
    }

    #[actix_web::test]
    async fn missing_or_bad_tokens_are_401() {
        let foreign = Crypto::new(b"other").encode(&Claims::new("user")).unwrap();
        for header in [
            None,
            Some("Basic abc".to_string()),
            Some("Bearer nonsense".to_string()),
            Some(format!("Bearer {}", foreign)),
        ] {
            let result = Auth::from_request(&request(header), &mut Payload::None).await;
            assert_eq!(status(result), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn unauthorized_is_json_detail() {
        let response = unauthorized("nope").error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

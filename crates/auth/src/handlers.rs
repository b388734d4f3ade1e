use super::*;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

/// `POST /token`: issue a bearer token to an admitted caller.
pub async fn token(
    crypto: web::Data<Crypto>,
    access: web::Data<Access>,
    login: Option<web::Json<LoginRequest>>,
) -> impl Responder {
    let Some(subject) = access.admit(login.as_deref()) else {
        return HttpResponse::Unauthorized()
            .json(serde_json::json!({"detail": "invalid credentials"}));
    };
    match crypto.encode(&Claims::new(&subject)) {
        Ok(token) => HttpResponse::Ok().json(TokenResponse::bearer(token)),
        Err(e) => {
            HttpResponse::InternalServerError().json(serde_json::json!({"detail": e.to_string()}))
        }
    }
}

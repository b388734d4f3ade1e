//! REST surface.
//!
//! Every route except `/`, `/health` and `/token` requires a bearer token.
//!
//! - [`Hub`] — Trainer and store, built once per process
//! - [`HubError`] — Failures with their HTTP status
//! - [`routes`] — Route table, for the server and for tests
//! - [`run`] — Start the server from the environment
mod dto;
mod error;
mod handlers;
mod hub;

pub use dto::*;
pub use error::*;
pub use hub::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use mlh_core::SERVER_WORKERS;

/// Register every route plus the JSON body policy. Expects `Hub`, `Crypto`
/// and `Access` to be provided as app data.
#[rustfmt::skip]
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        let detail = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "detail": detail })),
        )
        .into()
    }))
    .route("/",                  web::get().to(handlers::root))
    .route("/health",            web::get().to(handlers::health))
    .route("/token",             web::post().to(mlh_auth::token))
    .route("/models/",           web::get().to(handlers::available))
    .route("/models/stored",     web::get().to(handlers::stored))
    .route("/models/{id}",       web::get().to(handlers::describe))
    .route("/train/",            web::post().to(handlers::train))
    .route("/predict/{id}",      web::post().to(handlers::predict))
    .route("/retrain/{id}",      web::post().to(handlers::retrain))
    .route("/delete/{id}",       web::delete().to(handlers::delete))
    .route("/datasets/{name}",   web::post().to(handlers::import));
}

pub async fn run() -> Result<(), std::io::Error> {
    let hub = Hub::from_env().await.map_err(std::io::Error::other)?;
    let hub = web::Data::new(hub);
    let crypto = web::Data::new(mlh_auth::Crypto::from_env());
    let access = web::Data::new(mlh_auth::Access::from_env());
    let addr = mlh_core::env::var(mlh_core::env::BIND_ADDR, mlh_core::BIND_ADDR);
    log::info!("starting server on {} ({} bucket)", addr, hub.store().kind());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(hub.clone())
            .app_data(crypto.clone())
            .app_data(access.clone())
            .configure(routes)
    })
    .workers(SERVER_WORKERS)
    .bind(addr)?
    .run()
    .await
}

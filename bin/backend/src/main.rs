//! REST Server Binary
//!
//! Serves training, prediction and model management over HTTP.
//! Runs on BIND_ADDR (default 0.0.0.0:8000).

#[tokio::main]
async fn main() {
    mlh_core::log();
    mlh_core::kys();
    mlh_server::run().await.unwrap();
}

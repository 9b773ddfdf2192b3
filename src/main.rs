//! Intelligence Dashboard backend. Binary entrypoint.
//! Boots the Axum HTTP server on the Shuttle runtime.
//!
//! See `README.md` for environment variables and endpoints.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    intel_dashboard::init_tracing();

    let router = intel_dashboard::app().await?;
    Ok(router.into())
}

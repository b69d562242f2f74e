//! Backend entry-point: configuration, adapter wiring, HTTP serving.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::server::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()
        .map_err(|err| std::io::Error::other(format!("configuration: {err}")))?;

    backend::server::run(config).await
}

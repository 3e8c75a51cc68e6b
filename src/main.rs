use std::error::Error;

use ai_llm_service::telemetry;
use api::AppConfig;
use tracing::{Level, info};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if there is one.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(
            fmt::layer()
                .compact()
                .with_target(true)
                .with_filter(telemetry::excluding_this_crate()),
        )
        .with(telemetry::layer())
        .try_init()?;

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_env()?;
    api::start(config).await?;

    Ok(())
}

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkstone_worker::{run_sweep, RetentionConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkstone_worker=debug,inkstone_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = inkstone_db::create_pool(&database_url).await?;
    inkstone_db::health_check(&pool).await?;

    let config = RetentionConfig::from_env();
    tracing::info!(?config, "retention worker starting");

    let mut interval = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs));
    loop {
        interval.tick().await;
        if let Err(err) = run_sweep(&pool, &config).await {
            tracing::error!(error = %err, "retention sweep failed");
        }
    }
}

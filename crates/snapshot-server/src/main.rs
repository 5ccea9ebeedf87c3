use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snapshot_core::ResolverBuilder;
use snapshot_core::impls::S3ObjectStore;
use snapshot_server::Config;
use snapshot_server::http::{self, CorsPolicy};
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "snapshot-server")]
#[command(about = "Discover and hand out presigned links to bucket-stored snapshots")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long)]
    config: PathBuf,

    /// Override listen_addr from the config file
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapshot_server=info,snapshot_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %format!("{err:#}"), "snapshot server failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Arc::new(
        Config::load_from_path(&cli.config).context("failed to load configuration")?,
    );
    tracing::info!(
        config = %cli.config.display(),
        bucket = %config.store.bucket_name,
        endpoint = %config.store.endpoint,
        region = %config.store.region,
        file_path = ?config.file_path,
        "loaded configuration"
    );

    let store = S3ObjectStore::new(&config.store).context("failed to configure object store")?;
    let resolver = ResolverBuilder::new()
        .store(Arc::new(store))
        .build()
        .context("failed to build snapshot resolver")?;

    let app = http::router(
        Arc::new(resolver),
        CorsPolicy::new(config.cors_origins.iter().cloned()),
    );

    let listen = cli.listen.as_deref().unwrap_or(&config.listen_addr);
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;

    http::serve(listener, app, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("received shutdown signal");
    })
    .await
}

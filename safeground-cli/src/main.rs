use clap::Parser;
use safeground_cli::{build_pipeline, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let requests = cli.requests()?;
    let pipeline = build_pipeline(&cli, cli.phase()?)?;

    for request in &requests {
        let path = pipeline.run(request).await?;
        tracing::info!(path = %path.display(), "phase complete");
    }
    Ok(())
}

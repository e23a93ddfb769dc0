use crate::app::status::{render_stats, render_status};
use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use smilegen::config::ImageBackend;
use smilegen::media::ArtifactStore;
use smilegen::selection::Selector;
use smilegen::store::create_store;
use smilegen::studio::Studio;
use smilegen::{Config, gateway};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

async fn run_stats(config: &Config, recent: usize) -> Result<()> {
    let catalog = config.validate()?;
    let store = create_store(config).await?;
    store.seed(&catalog).await?;

    let selector = Selector::new(
        store.clone(),
        config.selection.weighted,
        config.selection.max_per_category,
    );
    let stats = selector.stats(&catalog).await?;
    let events = store.recent_events(recent).await?;
    println!("{}", render_stats(&stats, &events));
    Ok(())
}

/// One scene through the local compositor, written straight to `out`.
async fn run_draw(config: &Config, out: &Path) -> Result<()> {
    let mut config = config.clone();
    config.image.backend = ImageBackend::Local;

    let catalog = Arc::new(config.validate()?);
    let store = create_store(&config).await?;
    let artifacts = Arc::new(ArtifactStore::new(
        config.generated_dir(),
        config.inspiration_dir(),
    )?);
    let studio = Studio::from_config(&config, catalog, store, artifacts)?;

    let selection = studio.select().await?;
    let (prompt, png) = studio.render(&selection).await?;
    tokio::fs::write(out, &png)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    for (category, _) in selection.iter() {
        println!("{category:12} {}", selection.joined(category));
    }
    println!();
    println!("{prompt}");
    println!();
    println!("Saved {}", out.display());
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            if port == 0 {
                info!("Starting Smile Generator on {host} (random port)");
            } else {
                info!("Starting Smile Generator on {host}:{port}");
            }
            gateway::run_gateway(&host, port, Arc::clone(&config)).await
        }

        Commands::Stats { recent } => run_stats(&config, recent).await,

        Commands::Draw { out } => run_draw(&config, &out).await,

        Commands::Status => {
            println!("{}", render_status(&config));
            Ok(())
        }
    }
}

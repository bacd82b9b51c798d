use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use porter::config::Config;
use porter::server;

/// Serve static files from a document root.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (binds all interfaces)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    listen_port: Option<u16>,

    /// Directory to serve files from
    docroot_dir: Option<PathBuf>,

    /// YAML config file, read before environment overrides
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => {
            let mut cfg = Config::from_file(path)?;
            cfg.apply_overrides(|key| std::env::var(key).ok())?;
            cfg
        }
        None => Config::load()?,
    };
    if let Some(port) = cli.listen_port {
        cfg.set_port(port);
    }
    if let Some(root) = cli.docroot_dir {
        cfg.document_root = root;
    }
    cfg.validate()?;

    tokio::select! {
        res = server::listener::run(Arc::new(cfg)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

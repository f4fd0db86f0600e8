mod api;
mod cli;
mod expand;
mod export;
mod suggest;

pub const USER_AGENT: &str = concat!("kwexpand/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::{Cli, Command};
use expand::{ExpansionConfig, Expander};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kwexpand=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let expander = Expander::new(ExpansionConfig::from_env()?)?;

    match cli.command {
        Command::Serve { host, port } => {
            info!(%host, port, "starting kwexpand server");
            let listener = TcpListener::bind((host.as_str(), port))
                .await
                .inspect_err(|e| tracing::error!("failed to bind {host}:{port}: {e}"))?;
            api::serve(listener, expander).await?;
            info!("server stopped");
        }
        Command::Generate {
            keyword,
            format,
            out_dir,
        } => {
            cli::run_generate(&expander, &keyword, format, out_dir.as_deref()).await?;
        }
    }

    Ok(())
}

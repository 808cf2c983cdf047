//! Development server command.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use playground_server::{HostServer, PlaygroundPlugin, StaticFiles};

use super::config::ConfigFile;

/// Run the dev server.
pub async fn run(config: ConfigFile, port: Option<u16>, open: bool) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", config.server.host, port))?;

    tracing::info!("Starting playground for {}", config.paths.manifest.display());

    let plugin = PlaygroundPlugin::new(config.playground());
    let host = HostServer::start(vec![Box::new(plugin)])
        .context("Failed to start playground")?
        .with_fallback(StaticFiles::new(&config.paths.root));

    if open {
        let url = format!("http://{}", addr);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    host.listen(addr).await?;

    Ok(())
}

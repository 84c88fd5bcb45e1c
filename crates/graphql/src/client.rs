use std::time::Duration;

use anyhow::{Context, Result};
use configs::DocumentStoreConfig;
use mongodb::{bson::doc, options::ClientOptions, Client};
use tracing::{info, warn};

/// Connects and verifies the deployment with a ping.
///
/// On ping failure the client is shut down before the error is returned.
pub async fn connect(cfg: &DocumentStoreConfig) -> Result<Client> {
    let mut options = ClientOptions::parse(&cfg.uri).await.context("invalid document store URI")?;
    options.connect_timeout = Some(cfg.connect_timeout());
    options.server_selection_timeout = Some(cfg.connect_timeout());
    options.app_name = Some("haushalt-graphql".into());
    let client = Client::with_options(options).context("cannot build document store client")?;

    let database = client.database(&cfg.database);
    let ping = database.run_command(doc! { "ping": 1 }, None);
    let outcome = match tokio::time::timeout(cfg.ping_timeout(), ping).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(anyhow::Error::new(e).context("document store ping failed")),
        Err(_) => Err(anyhow::anyhow!("document store ping timed out after {:?}", cfg.ping_timeout())),
    };
    if let Err(e) = outcome {
        disconnect(client, cfg.disconnect_timeout()).await;
        return Err(e);
    }
    info!(database = %cfg.database, "document store connected");
    Ok(client)
}

/// Closes the client, giving up after `timeout`.
pub async fn disconnect(client: Client, timeout: Duration) {
    match tokio::time::timeout(timeout, client.shutdown()).await {
        Ok(()) => info!("document store client closed"),
        Err(_) => warn!(?timeout, "document store client did not close in time"),
    }
}

//! NATS message handlers

pub mod ping;
pub mod upload;

use anyhow::Result;
use async_nats::Client;
use sqlx::PgPool;
use tokio::select;
use tracing::{error, info};

use crate::services::csv_import::ImportCoordinator;

/// Start all message handlers
pub async fn start_handlers(client: Client, pool: PgPool) -> Result<()> {
    info!("Starting message handlers...");

    let coordinator = ImportCoordinator::new(pool.clone());

    let ping_sub = client.subscribe("messhall.ping").await?;
    let upload_submit_sub = client.subscribe("messhall.csv.upload.submit").await?;
    let upload_list_sub = client.subscribe("messhall.csv.upload.list").await?;

    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let client_upload_submit = client.clone();
    let client_upload_list = client.clone();

    let pool_upload_list = pool.clone();

    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let upload_submit_handle = tokio::spawn(async move {
        upload::handle_submit(client_upload_submit, upload_submit_sub, coordinator).await
    });

    let upload_list_handle = tokio::spawn(async move {
        upload::handle_list(client_upload_list, upload_list_sub, pool_upload_list).await
    });

    info!("All handlers started, waiting for messages...");

    // Any handler finishing means its subscription died
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = upload_submit_handle => {
            error!("Upload submit handler finished: {:?}", result);
        }
        result = upload_list_handle => {
            error!("Upload list handler finished: {:?}", result);
        }
    }

    Ok(())
}

//! CSV upload handlers: submission and the upload history view

use std::path::PathBuf;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::services::csv_import::ImportCoordinator;
use crate::types::{
    CsvUploadRequest, CsvUploadResponse, EmptyPayload, ErrorResponse, ImportKind, Request,
    SuccessResponse,
};

/// Roles allowed to upload and inspect CSV imports
const ALLOWED_ROLES: &[&str] = &["ADMIN", "FNB_MANAGER"];

/// Handle `messhall.csv.upload.submit`.
///
/// Validates role and kind synchronously, creates the upload record and
/// replies with its id; row processing continues in the background. The
/// gateway has already written the file to transient local storage.
pub async fn handle_submit(
    client: Client,
    mut subscriber: Subscriber,
    coordinator: ImportCoordinator,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received csv.upload.submit message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Upload submit message without reply subject");
                continue;
            }
        };

        let request: Request<CsvUploadRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse upload submit request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if !request.has_role(ALLOWED_ROLES) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", "role not allowed");
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        // The raw kind string is validated here, once, at the boundary; past
        // this point only the closed enum circulates.
        let kind: ImportKind = match request.payload.kind.parse() {
            Ok(kind) => kind,
            Err(e) => {
                let error = ErrorResponse::new(request.id, "INVALID_KIND", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let result = coordinator
            .start_import(
                PathBuf::from(&request.payload.file_path),
                kind,
                &request.payload.filename,
                &request.payload.submitted_by_name,
            )
            .await;

        match result {
            Ok((upload_id, _handle)) => {
                let response = SuccessResponse::new(
                    request.id,
                    CsvUploadResponse {
                        upload_id,
                        message: "CSV upload started".to_string(),
                    },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to start CSV import: {}", e);
                let error = ErrorResponse::new(request.id, "UPLOAD_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle `messhall.csv.upload.list`: the full upload registry, newest first
pub async fn handle_list(client: Client, mut subscriber: Subscriber, pool: PgPool) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received csv.upload.list message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Upload list message without reply subject");
                continue;
            }
        };

        let request: Request<EmptyPayload> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse upload list request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if !request.has_role(ALLOWED_ROLES) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", "role not allowed");
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::upload::list_uploads(&pool).await {
            Ok(uploads) => {
                let response = SuccessResponse::new(request.id, uploads);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to list uploads: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snapshot_core::ResolverError;

use super::ServerState;
use super::types::{
    ErrorResponse, FileItem, HealthResponse, KeysResponse, LatestResponse, MessageResponse,
};

pub(crate) fn message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub(crate) fn error(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn internal(err: ResolverError) -> Response {
    tracing::error!(error = %err, "request failed");
    error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub(crate) async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

pub(crate) async fn list_keys(State(state): State<ServerState>) -> Response {
    match state.resolver.list_namespaces().await {
        Ok(namespaces) => Json(KeysResponse {
            dirs: namespaces.iter().map(ToString::to_string).collect(),
        })
        .into_response(),
        Err(err) => internal(err),
    }
}

pub(crate) async fn list_files(
    State(state): State<ServerState>,
    Path((protocol, network)): Path<(String, String)>,
) -> Response {
    match state.resolver.list_snapshot_files(&protocol, &network).await {
        Ok(links) => {
            let files: Vec<FileItem> = links.into_iter().map(FileItem::from).collect();
            Json(files).into_response()
        }
        Err(err) => internal(err),
    }
}

pub(crate) async fn latest_snapshot(
    State(state): State<ServerState>,
    Path((protocol, network)): Path<(String, String)>,
) -> Response {
    match state.resolver.get_latest_snapshot(&protocol, &network).await {
        Ok(Some(link)) => Json(LatestResponse::from(link)).into_response(),
        Ok(None) => message(StatusCode::NOT_FOUND, "No snapshots found"),
        Err(err) => internal(err),
    }
}

pub(crate) async fn snapshot_info(
    State(state): State<ServerState>,
    Path((protocol, network)): Path<(String, String)>,
) -> Response {
    match state.resolver.get_snapshot_info(&protocol, &network).await {
        Ok(metadata) => Json(metadata.into_inner()).into_response(),
        Err(ResolverError::NotFound(_)) => message(StatusCode::NOT_FOUND, "Snapshot not found"),
        Err(err) => internal(err),
    }
}

pub(crate) async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not found".to_string())
}

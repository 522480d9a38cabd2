//! Firmware download endpoint.
//!
//! Endpoint:
//!   GET /?file={requested-name}
//!
//! Maps a (possibly outdated) firmware filename onto the current build of the
//! same board and serves it under the requested name. Checksum sidecars get
//! their embedded filename rewritten to match. `file=release.nfo` serves the
//! node manifest untouched.
//!
//! No authentication. Auto-updaters on the routers call this directly.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use fw_common::{AppError, AppResult};
use serde::Deserialize;

use crate::services::artifact::{canonical_path, resolve_artifact, rewrite_checksum};
use crate::services::boards::rewrite_board;
use crate::services::naming::{FirmwareRequest, Variant};
use crate::services::release::{manifest_path, read_version, MANIFEST_NAME};
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_firmware))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct FirmwareQuery {
    #[serde(default)]
    file: Option<String>,
}

// ─── Handler ─────────────────────────────────────────────────

async fn serve_firmware(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FirmwareQuery>, QueryRejection>,
) -> Response {
    // An unparsable query is just another name that fails the allow-list.
    let file = match query {
        Ok(Query(params)) => params.file.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unparsable firmware query");
            String::new()
        }
    };
    let root = state.config.firmware.root.as_path();

    let result = if file == MANIFEST_NAME {
        serve_manifest(root).await
    } else {
        serve_rewritten(root, &file).await
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(requested = %file, error = %e, "Firmware request failed");
            } else {
                tracing::warn!(requested = %file, error = %e, "Firmware request rejected");
            }
            e.page(state.config.firmware.expose_reasons)
        }
    }
}

async fn serve_manifest(root: &Path) -> AppResult<Response> {
    let relative = manifest_path(Variant::Node);
    let data = tokio::fs::read(root.join(&relative))
        .await
        .map_err(|e| AppError::ServerMisconfigured {
            path: relative.display().to_string(),
            detail: e.to_string(),
        })?;

    Ok(attachment(MANIFEST_NAME, data))
}

async fn serve_rewritten(root: &Path, file: &str) -> AppResult<Response> {
    let request = FirmwareRequest::parse(file)?;

    let variant = request.variant();
    let board = rewrite_board(&request.board());
    let version = read_version(root, variant).await?;

    let relative = canonical_path(variant, &version, &board, request.checksum());
    let path = resolve_artifact(root, &relative, request.name()).await?;

    let mut data = tokio::fs::read(&path).await?;
    if request.checksum().is_some() {
        let content = String::from_utf8_lossy(&data);
        data = rewrite_checksum(&content, request.image_name())
            .ok_or_else(|| AppError::MalformedChecksumFile {
                path: relative.display().to_string(),
            })?
            .into_bytes();
    }

    tracing::info!(
        requested = %request.name(),
        served = %relative.display(),
        variant = %variant,
        board = %board,
        version = %version,
        bytes = data.len(),
        "Serving rewritten firmware"
    );

    Ok(attachment(request.name(), data))
}

/// Binary download under `filename`, never cached.
fn attachment(filename: &str, data: Vec<u8>) -> Response {
    let len = data.len();

    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
            (header::CONTENT_LENGTH, len.to_string()),
            (
                header::CACHE_CONTROL,
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
        ],
        data,
    )
        .into_response()
}

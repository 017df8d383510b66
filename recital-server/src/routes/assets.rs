use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use recital_core::UploadError;
use recital_core::asset::{AssetStore, validate_asset_path};
use recital_core::remote::protocol::AssetUploaded;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/assets/{*path}", get(fetch).put(upload))
}

fn upload_error(err: UploadError) -> AppError {
    match err {
        UploadError::InvalidPath(_) => AppError::bad_request(err),
        other => AppError::Internal(other.into()),
    }
}

/// PUT /assets/{path} - Store an uploaded file
///
/// An existing file is never overwritten; the response carries the path the
/// file actually landed at.
async fn upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Json<AssetUploaded>, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("Empty upload"));
    }

    let asset = state.assets.upload(&body, &path).await.map_err(upload_error)?;

    tracing::info!("Stored asset {} ({} bytes)", asset.as_str(), body.len());
    Ok(Json(AssetUploaded { path: asset.0 }))
}

/// GET /assets/{path} - Serve a stored file
async fn fetch(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let relative = validate_asset_path(&path).map_err(upload_error)?;
    let full = state.asset_root.join(relative);

    let bytes = match tokio::fs::read(&full).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Asset not found: {path}")));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(([(header::CONTENT_TYPE, content_type(&path))], bytes))
}

fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("schedules/1-poster.JPG"), "image/jpeg");
        assert_eq!(content_type("schedules/1-poster.webp"), "image/webp");
        assert_eq!(content_type("schedules/README"), "application/octet-stream");
    }
}

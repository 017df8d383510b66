//! Record endpoints, shared by every content type

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use recital_core::Record;
use recital_core::remote::protocol::{collection_path, record_path};

use crate::routes::AppError;
use crate::state::{AppState, HasStore};

/// `GET|POST /{kind}` and `PUT|DELETE /{kind}/{id}` for one content type.
pub fn router<R: Record>() -> Router<AppState>
where
    AppState: HasStore<R>,
{
    Router::new()
        .route(&collection_path(R::KIND), get(list::<R>).post(create::<R>))
        .route(
            &record_path(R::KIND, "{id}"),
            put(update::<R>).delete(delete::<R>),
        )
}

/// Parse a request body and run it through the same validation as the admin
/// forms. The id in the body is ignored.
fn parse_record<R: Record>(body: &[u8], id: &str) -> Result<R, AppError> {
    let mut value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| AppError::bad_request("Invalid request body"))?;

    if let Some(fields) = value.as_object_mut() {
        fields.insert("id".into(), serde_json::Value::String(id.to_string()));
    }

    let record: R = serde_json::from_value(value).map_err(AppError::bad_request)?;
    R::from_draft(id.to_string(), &record.to_draft()).map_err(AppError::bad_request)
}

/// GET /{kind} - List all records
async fn list<R: Record>(State(state): State<AppState>) -> Json<Vec<R>>
where
    AppState: HasStore<R>,
{
    Json(HasStore::<R>::store(&state).list().await)
}

/// POST /{kind} - Create a record
async fn create<R: Record>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<R>), AppError>
where
    AppState: HasStore<R>,
{
    let record = parse_record::<R>(&body, "")?;
    let created = HasStore::<R>::store(&state).create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /{kind}/{id} - Replace a record
async fn update<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<R>, AppError>
where
    AppState: HasStore<R>,
{
    let record = parse_record::<R>(&body, &id)?;

    HasStore::<R>::store(&state)
        .update(&id, record)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} not found: {}", R::KIND, id)))
}

/// DELETE /{kind}/{id} - Remove a record
async fn delete<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    AppState: HasStore<R>,
{
    if HasStore::<R>::store(&state).delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{} not found: {}", R::KIND, id)))
    }
}

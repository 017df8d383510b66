use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use recital_core::contact::ContactMessage;
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(send))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactSent {
    message: &'static str,
    message_id: String,
}

/// POST /contact - Queue a contact form message
async fn send(State(state): State<AppState>, body: Bytes) -> Result<Json<ContactSent>, AppError> {
    let message: ContactMessage = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("Invalid request body"))?;

    message.validate().map_err(AppError::bad_request)?;

    let message_id = state.mailbox.deliver(&message).await?;

    Ok(Json(ContactSent {
        message: "Email sent successfully",
        message_id,
    }))
}

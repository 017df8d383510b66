//! Outbox for contact form messages.
//!
//! Sending mail is left to whatever picks up the outbox; the server only
//! writes one JSON file per accepted message.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use recital_core::contact::ContactMessage;
use serde::Serialize;

/// What gets written to the outbox.
#[derive(Debug, Serialize)]
pub struct OutgoingMail {
    pub message_id: String,
    pub subject: String,
    pub body: String,
    pub reply_to: String,
    pub received_at: DateTime<Utc>,
}

pub struct Mailbox {
    outbox: PathBuf,
}

impl Mailbox {
    pub fn new(outbox: PathBuf) -> Self {
        Mailbox { outbox }
    }

    /// Queue a validated message. Returns its message id.
    pub async fn deliver(&self, message: &ContactMessage) -> Result<String> {
        let received_at = Utc::now();
        let message_id = uuid::Uuid::new_v4().to_string();

        let mail = OutgoingMail {
            message_id: message_id.clone(),
            subject: message.subject(),
            body: message.body(),
            reply_to: message.email.trim().to_string(),
            received_at,
        };

        tokio::fs::create_dir_all(&self.outbox).await?;
        let path = self.outbox.join(format!(
            "{}-{}.json",
            received_at.format("%Y%m%dT%H%M%S"),
            message_id
        ));
        tokio::fs::write(&path, serde_json::to_string_pretty(&mail)?).await?;

        tracing::info!("Queued contact message {} from {}", message_id, mail.reply_to);
        Ok(message_id)
    }
}

//! JSON bodies shared by the HTTP data source and recital-server.

use serde::{Deserialize, Serialize};

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: message.into(),
        }
    }
}

/// Response to an asset upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetUploaded {
    pub path: String,
}

/// Path of the collection endpoint for a content type, e.g. `/schedules`.
pub fn collection_path(kind: &str) -> String {
    format!("/{kind}")
}

/// Path of a single record, e.g. `/schedules/{id}`.
pub fn record_path(kind: &str, id: &str) -> String {
    format!("/{kind}/{id}")
}

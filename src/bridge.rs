//! Typed request/response contract between the sandboxed page and the host.
//!
//! The page never gets filesystem or process access; it can only ask for the
//! operations listed in [`BridgeRequest`]. A GUI host forwards the JSON it
//! receives over its IPC channel to [`Bridge::handle_json`] and sends the
//! reply back.
//!
//! ```json
//! {"op": "setSetting", "key": "startUrl", "value": "https://lampa.mx"}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::page_storage::{LocalStorageSnapshot, PageStorage, PageStorageError};
use crate::settings::{SettingsError, SettingsMap, SettingsStore};
use crate::user_agent::platform_label;

/// Operations the page may request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BridgeRequest {
    GetSetting {
        key: String,
        #[serde(default)]
        default: Value,
    },
    SetSetting { key: String, value: Value },
    GetAllSettings,
    SetAllSettings { settings: SettingsMap },
    ClearSettings,
    ReadPageStorage,
    WritePageStorage { entries: LocalStorageSnapshot },
    GetAppVersion,
    GetPlatform,
}

/// Replies to [`BridgeRequest`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BridgeResponse {
    Value { value: Value },
    Settings { settings: SettingsMap },
    PageStorage { entries: LocalStorageSnapshot },
    Text { text: String },
    Done,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    PageStorage(#[from] PageStorageError),
    #[error("invalid bridge request: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Dispatches bridge requests to the settings store and page storage.
#[derive(Debug, Clone)]
pub struct Bridge {
    store: Arc<SettingsStore>,
    page_storage: Arc<dyn PageStorage>,
    app_version: String,
}

impl Bridge {
    pub fn new(
        store: Arc<SettingsStore>,
        page_storage: Arc<dyn PageStorage>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            page_storage,
            app_version: app_version.into(),
        }
    }

    /// Executes one request.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the settings store or page storage fails.
    pub fn handle(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError> {
        debug!(?request, "Bridge request");
        let response = match request {
            BridgeRequest::GetSetting { key, default } => BridgeResponse::Value {
                value: self.store.get(&key, default),
            },
            BridgeRequest::SetSetting { key, value } => {
                self.store.set(&key, value)?;
                BridgeResponse::Done
            }
            BridgeRequest::GetAllSettings => BridgeResponse::Settings {
                settings: self.store.get_all(),
            },
            BridgeRequest::SetAllSettings { settings } => {
                self.store.set_all(settings)?;
                BridgeResponse::Done
            }
            BridgeRequest::ClearSettings => {
                self.store.clear()?;
                BridgeResponse::Done
            }
            BridgeRequest::ReadPageStorage => BridgeResponse::PageStorage {
                entries: self.page_storage.snapshot()?,
            },
            BridgeRequest::WritePageStorage { entries } => {
                self.page_storage.apply(&entries)?;
                BridgeResponse::Done
            }
            BridgeRequest::GetAppVersion => BridgeResponse::Text {
                text: self.app_version.clone(),
            },
            BridgeRequest::GetPlatform => BridgeResponse::Text {
                text: platform_label().to_string(),
            },
        };
        Ok(response)
    }

    /// Decodes a JSON request, executes it and encodes the reply.
    ///
    /// Failures are encoded as `{"error": "<message>"}` so the page always
    /// gets an answer.
    #[must_use]
    pub fn handle_json(&self, raw: &str) -> String {
        let outcome = serde_json::from_str::<BridgeRequest>(raw)
            .map_err(BridgeError::from)
            .and_then(|request| self.handle(request));

        let reply = match outcome {
            Ok(response) => serde_json::to_value(&response)
                .unwrap_or_else(|e| json!({ "error": e.to_string() })),
            Err(error) => {
                warn!(error = %error, "Bridge request failed");
                json!({ "error": error.to_string() })
            }
        };
        reply.to_string()
    }
}

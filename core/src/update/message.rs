use serde::{Deserialize, Serialize};

/// Messages posted from the page to a service worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Promote the waiting worker to active controller.
    SkipWaiting,
}

impl WorkerMessage {
    pub fn to_json(&self) -> String {
        // Unit variants with a string tag always serialize.
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"type":"SKIP_WAITING"}"#))
    }
}

/// A worker that can receive `postMessage` payloads.
pub trait WorkerHandle: Send + Sync {
    fn post_message(&self, message: &WorkerMessage);
}

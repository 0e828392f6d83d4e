//! Events published on the application event bus.
//!
//! Trend recording runs in the background, so its outcome is reported here
//! instead of to the search that triggered it.

use serde::Serialize;

/// Events sent to connected clients via SSE (Server-Sent Events).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    SearchRecorded { term: String },

    SearchRecordFailed { term: String, message: String },

    SearchRecordDropped { term: String },
}

//! Chrome trace viewer event model.
//!
//! Events follow the Trace Event Format consumed by chrome://tracing and
//! Perfetto: flat JSON objects with short field names (`ph`, `ts`, `dur`,
//! `pid`, `tid`). Only the phases this tool emits are modeled.

use serde::Serialize;

/// Event phase, serialized as the viewer's single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Timed event carrying both start time and duration.
    #[serde(rename = "X")]
    Complete,
    /// Span start; paired with a later `End` on the same pid/tid.
    #[serde(rename = "B")]
    Begin,
    /// Span end.
    #[serde(rename = "E")]
    End,
    /// Stream metadata (process names etc.), not a timed event.
    #[serde(rename = "M")]
    Metadata,
}

/// One entry in the viewer's `traceEvents` array.
///
/// `pid` groups events into a process track and `tid` into a lane within it;
/// neither has to correspond to a real OS process or thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerEvent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "ph")]
    pub phase: Phase,
    /// Absolute timestamp in microseconds.
    #[serde(rename = "ts")]
    pub time: i64,
    /// Duration in microseconds; only present on complete events.
    #[serde(rename = "dur", skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub pid: u64,
    pub tid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

impl ViewerEvent {
    /// Fully-stamped complete event (phase `X`).
    pub fn complete(name: impl Into<String>, time: i64, duration: i64, pid: u64, tid: u64) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Complete,
            time,
            duration: Some(duration),
            pid,
            tid,
            args: None,
        }
    }

    /// Durationless span marker (phases `B`/`E`).
    pub fn marker(phase: Phase, name: impl Into<String>, time: i64, pid: u64, tid: u64) -> Self {
        Self {
            name: name.into(),
            phase,
            time,
            duration: None,
            pid,
            tid,
            args: None,
        }
    }
}

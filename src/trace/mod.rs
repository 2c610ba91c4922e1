//! Trace event model and Chrome Trace Format output.
//!
//! The viewer consumes a JSON array of events; [`TraceWriter`] streams one
//! out, and [`TraceSink`] is the narrow interface importers write through so
//! tests can substitute a recording sink.

pub mod event;
pub mod writer;

// Re-export main types for convenience
pub use event::{Phase, ViewerEvent};
pub use writer::{TraceSink, TraceWriter};

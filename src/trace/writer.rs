//! Streaming Chrome Trace Format writer.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use super::event::{Phase, ViewerEvent};

/// Process track for the tool's own marker spans; imported lane groups get
/// their own pid.
const TOOL_PID: u64 = 0;

/// Narrow event-emission interface importers write through.
///
/// `begin`/`end` frame an operation with a span stamped at the current wall
/// clock; `complete` forwards a fully-stamped event. Implementations must be
/// safe to call repeatedly and synchronously from a single thread.
pub trait TraceSink {
    /// Open a span named `name` on lane `tid`.
    fn begin(&mut self, name: &str, tid: u64) -> io::Result<()>;

    /// Close the most recent open span on lane `tid`.
    fn end(&mut self, tid: u64) -> io::Result<()>;

    /// Emit one complete event.
    fn complete(&mut self, event: ViewerEvent) -> io::Result<()>;
}

/// Streams viewer events into `out` as one JSON array.
///
/// The opening bracket is written on construction and the closing bracket by
/// [`TraceWriter::finish`]; events in between are written immediately, one per
/// call, with no buffering beyond whatever `out` itself does.
pub struct TraceWriter<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        out.write_all(b"[\n")?;
        Ok(Self { out, count: 0 })
    }

    /// Label a process track in the viewer (`M` metadata event).
    pub fn process_name(&mut self, pid: u64, name: &str) -> io::Result<()> {
        self.write_event(&ViewerEvent {
            name: "process_name".to_string(),
            phase: Phase::Metadata,
            time: 0,
            duration: None,
            pid,
            tid: 0,
            args: Some(json!({ "name": name })),
        })
    }

    /// Close the JSON array and flush, returning the underlying stream.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.write_all(b"\n]\n")?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_event(&mut self, event: &ViewerEvent) -> io::Result<()> {
        if self.count > 0 {
            self.out.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut self.out, event)?;
        self.count += 1;
        Ok(())
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn begin(&mut self, name: &str, tid: u64) -> io::Result<()> {
        let event = ViewerEvent::marker(Phase::Begin, name, now_micros(), TOOL_PID, tid);
        self.write_event(&event)
    }

    fn end(&mut self, tid: u64) -> io::Result<()> {
        let event = ViewerEvent::marker(Phase::End, "", now_micros(), TOOL_PID, tid);
        self.write_event(&event)
    }

    fn complete(&mut self, event: ViewerEvent) -> io::Result<()> {
        self.write_event(&event)
    }
}

fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

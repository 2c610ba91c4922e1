//! One-shot import of a ninja log into an open trace stream.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::diagnostics::Diagnostics;
use crate::trace::{TraceSink, ViewerEvent};

use super::lanes::assign_lanes;
use super::parse::read_log;

/// Process id stamped on every imported task, so the reconstructed lanes show
/// up as one process group in the viewer.
pub const NINJA_PID: u64 = 1;

/// Lane carrying the import's own marker span.
const IMPORT_TID: u64 = 0;

/// Name on the marker span framing the import.
const IMPORT_SPAN: &str = "ninja log import";

/// Import the log at `path` into `sink`, anchoring log-relative offsets at
/// `origin` (an absolute clock reading, converted to microseconds since the
/// Unix epoch).
///
/// `origin` doubles as a staleness cutoff: a log last modified before it has
/// nothing new to show and is skipped. Every failure is reported through
/// `diag` and ends the import early; the call itself always returns normally,
/// having emitted zero or more events. The framing marker span is emitted on
/// every path.
pub fn import_ninja_log(
    sink: &mut dyn TraceSink,
    diag: &dyn Diagnostics,
    path: &Path,
    origin: SystemTime,
) {
    if let Err(e) = sink.begin(IMPORT_SPAN, IMPORT_TID) {
        diag.message(&format!("Error writing trace events: {e}"));
        return;
    }
    if let Err(e) = import_entries(sink, diag, path, origin) {
        diag.message(&format!("Error writing trace events: {e}"));
    }
    if let Err(e) = sink.end(IMPORT_TID) {
        diag.message(&format!("Error writing trace events: {e}"));
    }
}

/// Inner body; `Err` means the sink itself failed mid-write. Problems with
/// the log are diagnosed and swallowed here so the caller sees a normal
/// return either way.
fn import_entries(
    sink: &mut dyn TraceSink,
    diag: &dyn Diagnostics,
    path: &Path,
    origin: SystemTime,
) -> io::Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            diag.message(&format!("Missing ninja log: {e}"));
            return Ok(());
        }
    };
    match metadata.modified() {
        Ok(mtime) if mtime < origin => {
            diag.verbose("Ninja log not modified, not importing any entries.");
            return Ok(());
        }
        Ok(_) => {}
        Err(e) => {
            diag.message(&format!("Unable to read ninja log mtime: {e}"));
            return Ok(());
        }
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            diag.message(&format!("Error opening ninja log: {e}"));
            return Ok(());
        }
    };
    let entries = match read_log(BufReader::new(file)) {
        Ok(entries) => entries,
        Err(e) => {
            diag.message(&format!("Unable to parse ninja log: {e}"));
            return Ok(());
        }
    };

    let origin_micros = origin
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0);
    for (entry, lane) in entries.iter().zip(assign_lanes(&entries)) {
        sink.complete(ViewerEvent::complete(
            entry.name.clone(),
            origin_micros + entry.begin_ms * 1000,
            (entry.end_ms - entry.begin_ms) * 1000,
            NINJA_PID,
            lane as u64,
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::time::Duration;

    use crate::diagnostics::testing::RecordedDiagnostics;
    use crate::trace::Phase;

    use super::*;

    /// Records sink calls instead of serializing them.
    #[derive(Default)]
    struct RecordingSink {
        begins: Vec<(String, u64)>,
        ends: Vec<u64>,
        events: Vec<ViewerEvent>,
        fail_completes: bool,
    }

    impl TraceSink for RecordingSink {
        fn begin(&mut self, name: &str, tid: u64) -> io::Result<()> {
            self.begins.push((name.to_string(), tid));
            Ok(())
        }

        fn end(&mut self, tid: u64) -> io::Result<()> {
            self.ends.push(tid);
            Ok(())
        }

        fn complete(&mut self, event: ViewerEvent) -> io::Result<()> {
            if self.fail_completes {
                return Err(io::Error::other("sink closed"));
            }
            self.events.push(event);
            Ok(())
        }
    }

    fn write_log(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(".ninja_log");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const SAMPLE_LOG: &str = concat!(
        "# ninja log v5\n",
        "0\t10\t0\tout/a.o\t1a2b3c\n",
        "5\t15\t0\tout/b.o\t4d5e6f\n",
        "20\t25\t0\tout/link\t7a8b9c\n",
    );

    #[test]
    fn test_import_emits_absolute_complete_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, SAMPLE_LOG);
        let origin = UNIX_EPOCH + Duration::from_secs(1_000);

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, origin);

        // Marker span frames the import
        assert_eq!(sink.begins, [("ninja log import".to_string(), 0)]);
        assert_eq!(sink.ends, [0]);

        let origin_micros = 1_000_000_000;
        assert_eq!(
            sink.events,
            [
                ViewerEvent::complete("out/a.o", origin_micros, 10_000, NINJA_PID, 0),
                ViewerEvent::complete("out/b.o", origin_micros + 5_000, 10_000, NINJA_PID, 1),
                ViewerEvent::complete("out/link", origin_micros + 20_000, 5_000, NINJA_PID, 0),
            ]
        );
        assert!(sink.events.iter().all(|e| e.phase == Phase::Complete));
        assert!(diag.messages.borrow().is_empty());
    }

    #[test]
    fn test_missing_log_emits_nothing_but_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-log");

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, UNIX_EPOCH);

        assert!(sink.events.is_empty());
        assert_eq!(sink.begins.len(), 1);
        assert_eq!(sink.ends.len(), 1);
        assert!(diag.messages.borrow()[0].starts_with("Missing ninja log:"));
    }

    #[test]
    fn test_stale_log_is_skipped_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, SAMPLE_LOG);
        // Origin far in the future: the log predates it
        let origin = SystemTime::now() + Duration::from_secs(3_600);

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, origin);

        assert!(sink.events.is_empty());
        // A normal, expected outcome: verbose only
        assert!(diag.messages.borrow().is_empty());
        assert_eq!(
            diag.verbose_messages.borrow().as_slice(),
            ["Ninja log not modified, not importing any entries."]
        );
    }

    #[test]
    fn test_wrong_header_emits_zero_events_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "# ninja log v4\n0\t10\t0\tout/a.o\t00\n");

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, UNIX_EPOCH);

        assert!(sink.events.is_empty());
        let messages = diag.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("unknown ninja log header"));
        // The marker span still closes
        assert_eq!(sink.ends, [0]);
    }

    #[test]
    fn test_unparseable_entry_emits_zero_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "# ninja log v5\n0\tten\t0\tout/a.o\t00\n");

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, UNIX_EPOCH);

        assert!(sink.events.is_empty());
        assert!(diag.messages.borrow()[0].starts_with("Unable to parse ninja log:"));
    }

    #[test]
    fn test_restarted_log_imports_only_the_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            &dir,
            concat!(
                "# ninja log v5\n",
                "0\t500\t0\tstale/a.o\t00\n",
                "10\t30\t0\tfresh/a.o\t01\n",
                "30\t60\t0\tfresh/link\t02\n",
            ),
        );

        let mut sink = RecordingSink::default();
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, UNIX_EPOCH);

        let names: Vec<_> = sink.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["fresh/a.o", "fresh/link"]);
    }

    #[test]
    fn test_sink_failure_is_diagnosed_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, SAMPLE_LOG);

        let mut sink = RecordingSink {
            fail_completes: true,
            ..Default::default()
        };
        let diag = RecordedDiagnostics::default();
        import_ninja_log(&mut sink, &diag, &path, UNIX_EPOCH);

        assert!(sink.events.is_empty());
        assert!(diag.messages.borrow()[0].starts_with("Error writing trace events:"));
        // The marker span still closes
        assert_eq!(sink.ends, [0]);
    }
}

//! `.ninja_log` reader.
//!
//! Ninja appends one line per completed task:
//! `start_ms \t end_ms \t restat_mtime \t output \t cmd_hash`, offsets in
//! milliseconds relative to the start of the build that wrote the line. Within
//! one build the file only grows, but an incremental rebuild rewrites it from
//! an earlier point, so an end time regressing mid-file means everything
//! before the regression describes a stale build.

use std::io::BufRead;

/// Version header this importer understands; anything else is rejected.
pub const LOG_HEADER: &str = "# ninja log v5";

/// One completed task from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub name: String,
    /// Start offset in milliseconds from the log's zero time.
    pub begin_ms: i64,
    /// End offset in milliseconds from the log's zero time. Expected to be
    /// >= `begin_ms` but passed through as recorded either way.
    pub end_ms: i64,
}

/// Why a log failed to parse. Parsing is all-or-nothing: any of these
/// abandons every entry.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown ninja log header: {0:?}")]
    UnknownHeader(String),

    #[error("unable to parse ninja log entry {line:?}: {source}")]
    BadOffset {
        line: String,
        source: std::num::ParseIntError,
    },

    #[error("ninja log entry {0:?} has fewer than 4 fields")]
    MissingFields(String),

    #[error("unable to read ninja log: {0}")]
    Io(#[from] std::io::Error),
}

/// Read and validate an entire log, returning entries sorted by begin time.
///
/// Restart detection: an entry ending before its predecessor (in file order)
/// discards everything accumulated so far; accumulation restarts at that
/// entry. Only the tail after the last such regression is trustworthy.
pub fn read_log(input: impl BufRead) -> Result<Vec<LogEntry>, ParseError> {
    let mut lines = input.lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    if header != LOG_HEADER {
        return Err(ParseError::UnknownHeader(header));
    }

    let mut entries: Vec<LogEntry> = Vec::new();
    let mut prev_end = 0;
    for line in lines {
        let entry = parse_entry(&line?)?;
        if entry.end_ms < prev_end {
            entries.clear();
        }
        prev_end = entry.end_ms;
        entries.push(entry);
    }

    entries.sort_by_key(|entry| entry.begin_ms);
    Ok(entries)
}

/// Split one data line into the fields the importer consumes.
///
/// The layout is positional with fields we never look at (restat mtime,
/// command hash); naming the consumed positions here keeps the rest of the
/// code from depending on raw indices.
fn parse_entry(line: &str) -> Result<LogEntry, ParseError> {
    let mut fields = line.split('\t');
    let mut next = || {
        fields
            .next()
            .ok_or_else(|| ParseError::MissingFields(line.to_string()))
    };
    let begin_raw = next()?;
    let end_raw = next()?;
    let _restat_mtime = next()?;
    let name = next()?;
    // Anything after the name (the command hash) is ignored.

    let parse_ms = |raw: &str| {
        raw.parse().map_err(|source| ParseError::BadOffset {
            line: line.to_string(),
            source,
        })
    };

    Ok(LogEntry {
        name: name.to_string(),
        begin_ms: parse_ms(begin_raw)?,
        end_ms: parse_ms(end_raw)?,
    })
}

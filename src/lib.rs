//! Convert ninja build logs into Chrome trace viewer timelines.
//!
//! Ninja's `.ninja_log` records when every task of a past build started and
//! finished, but nothing about which worker ran it. This crate parses the log,
//! reconstructs plausible execution lanes from the recorded intervals, and
//! writes the result as Chrome Trace Format JSON for chrome://tracing or
//! <https://ui.perfetto.dev>.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//!
//! use ninjatrace::diagnostics::LogDiagnostics;
//! use ninjatrace::ninja::import_ninja_log;
//! use ninjatrace::trace::TraceWriter;
//!
//! let mut writer = TraceWriter::new(std::io::stdout().lock())?;
//! import_ninja_log(&mut writer, &LogDiagnostics, Path::new(".ninja_log"), origin);
//! writer.finish()?;
//! ```

pub mod diagnostics;
pub mod ninja;
pub mod trace;

//! Leveled diagnostics for import progress and failures.
//!
//! The importer never fails its caller; everything it has to say goes through
//! this collaborator instead. Injecting it (rather than logging directly)
//! keeps the parser and scheduler testable without capturing real log output.

/// Message sink with the two severities the importer distinguishes.
pub trait Diagnostics {
    /// Failures and skip conditions worth surfacing by default.
    fn message(&self, msg: &str);

    /// Expected-outcome detail (e.g. "log unchanged"), hidden unless asked for.
    fn verbose(&self, msg: &str);
}

/// Production sink: routes through the `log` facade, so the binary's
/// `env_logger` filter decides what is shown.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn message(&self, msg: &str) {
        log::info!("{msg}");
    }

    fn verbose(&self, msg: &str) {
        log::debug!("{msg}");
    }
}

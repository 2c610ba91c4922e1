use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use chrono::DateTime;
use clap::Parser;

use ninjatrace::diagnostics::LogDiagnostics;
use ninjatrace::ninja::{NINJA_PID, import_ninja_log};
use ninjatrace::trace::TraceWriter;

#[derive(Parser)]
#[command(name = "ninjatrace")]
#[command(about = "Convert ninja build logs into Chrome trace viewer timelines")]
#[command(version)]
struct Cli {
    /// Ninja log to import
    #[arg(default_value = ".ninja_log")]
    log: PathBuf,

    /// Trace file to write ("-" for stdout)
    #[arg(short, long, default_value = "ninja_trace.json")]
    output: PathBuf,

    /// Anchor log offsets at this time (RFC 3339) and skip logs not modified
    /// since then. Defaults to the Unix epoch: import everything, offsets
    /// starting at zero.
    #[arg(long, value_name = "TIME")]
    origin: Option<String>,

    /// Show verbose diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    let origin = match &cli.origin {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --origin value {raw:?}"))?;
            SystemTime::from(parsed)
        }
        None => SystemTime::UNIX_EPOCH,
    };

    let out: Box<dyn Write> = if cli.output == Path::new("-") {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("failed to create {}", cli.output.display()))?;
        Box::new(file)
    };

    let mut writer =
        TraceWriter::new(BufWriter::new(out)).context("failed to start trace file")?;
    writer
        .process_name(NINJA_PID, "ninja")
        .context("failed to write trace metadata")?;
    import_ninja_log(&mut writer, &LogDiagnostics, &cli.log, origin);
    writer.finish().context("failed to finalize trace file")?;

    Ok(())
}

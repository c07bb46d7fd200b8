use crate::report::types::Report;
use mtrwrap_core::TraceResult;
use std::io::Write;
use tracing::instrument;

/// Generate a json report of the trace result.
///
/// Failed traces are reported too, with the error output in place of hops.
#[instrument(skip_all, level = "trace")]
pub fn report<W: Write>(target: &str, result: &TraceResult, mut writer: W) -> anyhow::Result<()> {
    let report = Report::new(target, result);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

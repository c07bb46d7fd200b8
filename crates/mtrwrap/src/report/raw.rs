use mtrwrap_core::TraceResult;
use std::io::Write;
use tracing::instrument;

/// Write the captured report exactly as `mtr` produced it.
#[instrument(skip_all, level = "trace")]
pub fn report<W: Write>(result: &TraceResult, mut writer: W) -> anyhow::Result<()> {
    writer.write_all(result.results.raw().as_bytes())?;
    writer.flush()?;
    Ok(())
}

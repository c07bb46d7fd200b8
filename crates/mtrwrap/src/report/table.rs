use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};
use mtrwrap_core::TraceResult;
use std::io::Write;
use tracing::instrument;

/// Generate a Markdown table report of the trace result.
#[instrument(skip_all, level = "trace")]
pub fn report_md<W: Write>(result: &TraceResult, writer: W) -> anyhow::Result<()> {
    run_report_table(result, ASCII_MARKDOWN, writer)
}

/// Generate a pretty table report of the trace result.
#[instrument(skip_all, level = "trace")]
pub fn report_pretty<W: Write>(result: &TraceResult, writer: W) -> anyhow::Result<()> {
    run_report_table(result, UTF8_FULL, writer)
}

fn run_report_table<W: Write>(
    result: &TraceResult,
    preset: &str,
    mut writer: W,
) -> anyhow::Result<()> {
    let columns = vec![
        "Hop", "Host", "Loss%", "Snt", "Drop", "Rcv", "Last", "Best", "Avg", "Wrst", "Jttr",
        "Javg", "Jmax", "Jint",
    ];
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns);
    let hops = result.as_report().map(|report| report.hops.as_slice());
    for hop in hops.unwrap_or_default() {
        table.add_row(vec![
            hop.hop_id.to_string(),
            hop.host.clone(),
            hop.loss.to_string(),
            hop.snt.to_string(),
            hop.drop.to_string(),
            hop.rcv.to_string(),
            hop.last.to_string(),
            hop.best.to_string(),
            hop.avg.to_string(),
            hop.wrst.to_string(),
            hop.jttr.to_string(),
            hop.javg.to_string(),
            hop.jmax.to_string(),
            hop.jint.to_string(),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

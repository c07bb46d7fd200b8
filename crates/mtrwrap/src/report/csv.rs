use mtrwrap_core::{Hop, TraceResult};
use serde::Serialize;
use std::io::Write;
use tracing::instrument;

/// Generate a CSV report of the trace result.
#[instrument(skip_all, level = "trace")]
pub fn report<W: Write>(target: &str, result: &TraceResult, writer: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let hops = result.as_report().map(|report| report.hops.as_slice());
    for hop in hops.unwrap_or_default() {
        writer.serialize(CsvRow::new(target, hop))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
pub struct CsvRow<'a> {
    #[serde(rename = "Target")]
    pub target: &'a str,
    #[serde(rename = "Hop")]
    pub hop_id: u32,
    #[serde(rename = "Host")]
    pub host: &'a str,
    #[serde(rename = "Loss%")]
    pub loss: &'a str,
    #[serde(rename = "Snt")]
    pub snt: &'a str,
    #[serde(rename = "Drop")]
    pub drop: &'a str,
    #[serde(rename = "Rcv")]
    pub rcv: &'a str,
    #[serde(rename = "Last")]
    pub last: &'a str,
    #[serde(rename = "Best")]
    pub best: &'a str,
    #[serde(rename = "Avg")]
    pub avg: &'a str,
    #[serde(rename = "Wrst")]
    pub wrst: &'a str,
    #[serde(rename = "Jttr")]
    pub jttr: &'a str,
    #[serde(rename = "Javg")]
    pub javg: &'a str,
    #[serde(rename = "Jmax")]
    pub jmax: &'a str,
    #[serde(rename = "Jint")]
    pub jint: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(target: &'a str, hop: &'a Hop) -> Self {
        Self {
            target,
            hop_id: hop.hop_id,
            host: &hop.host,
            loss: hop.loss.as_str(),
            snt: hop.snt.as_str(),
            drop: hop.drop.as_str(),
            rcv: hop.rcv.as_str(),
            last: hop.last.as_str(),
            best: hop.best.as_str(),
            avg: hop.avg.as_str(),
            wrst: hop.wrst.as_str(),
            jttr: hop.jttr.as_str(),
            javg: hop.javg.as_str(),
            jmax: hop.jmax.as_str(),
            jint: hop.jint.as_str(),
        }
    }
}

use mtrwrap_core::{Stat, TraceResult};
use serde::{Serialize, Serializer};

#[derive(Serialize)]
pub struct Report {
    pub info: Info,
    pub hops: Vec<Hop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new(target: &str, result: &TraceResult) -> Self {
        let info = Info {
            target: String::from(target),
            args: result.args.clone(),
            code: result.code.0,
            status: result.status.to_string(),
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
        };
        match (result.as_report(), result.as_failure()) {
            (Some(report), _) => Self {
                info,
                hops: report.hops.iter().map(Hop::from).collect(),
                skipped: Some(report.skipped),
                error: None,
            },
            (None, failure) => Self {
                info,
                hops: vec![],
                skipped: None,
                error: failure.map(|failure| failure.raw.clone()),
            },
        }
    }
}

#[derive(Serialize)]
pub struct Info {
    pub target: String,
    pub args: Vec<String>,
    pub code: i32,
    pub status: String,
    #[serde(serialize_with = "fixed_width")]
    pub elapsed_ms: f64,
}

#[derive(Serialize)]
pub struct Hop {
    pub hop_id: u32,
    pub host: String,
    #[serde(serialize_with = "verbatim")]
    pub loss: Stat,
    #[serde(serialize_with = "verbatim")]
    pub snt: Stat,
    #[serde(serialize_with = "verbatim")]
    pub drop: Stat,
    #[serde(serialize_with = "verbatim")]
    pub rcv: Stat,
    #[serde(serialize_with = "verbatim")]
    pub last: Stat,
    #[serde(serialize_with = "verbatim")]
    pub best: Stat,
    #[serde(serialize_with = "verbatim")]
    pub avg: Stat,
    #[serde(serialize_with = "verbatim")]
    pub wrst: Stat,
    #[serde(serialize_with = "verbatim")]
    pub jttr: Stat,
    #[serde(serialize_with = "verbatim")]
    pub javg: Stat,
    #[serde(serialize_with = "verbatim")]
    pub jmax: Stat,
    #[serde(serialize_with = "verbatim")]
    pub jint: Stat,
}

impl From<&mtrwrap_core::Hop> for Hop {
    fn from(value: &mtrwrap_core::Hop) -> Self {
        Self {
            hop_id: value.hop_id,
            host: value.host.clone(),
            loss: value.loss.clone(),
            snt: value.snt.clone(),
            drop: value.drop.clone(),
            rcv: value.rcv.clone(),
            last: value.last.clone(),
            best: value.best.clone(),
            avg: value.avg.clone(),
            wrst: value.wrst.clone(),
            jttr: value.jttr.clone(),
            javg: value.javg.clone(),
            jmax: value.jmax.clone(),
            jint: value.jint.clone(),
        }
    }
}

#[expect(clippy::trivially_copy_pass_by_ref)]
pub fn fixed_width<S>(val: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{val:.2}"))
}

/// Statistics are kept as written by `mtr`, placeholders included.
pub fn verbatim<S>(val: &Stat, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(val.as_str())
}

use regex::{Captures, Regex};
use std::fmt::{Display, Formatter, Write};
use std::sync::OnceLock;
use tracing::instrument;

/// A statistic column of the `mtr` report.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Column {
    /// The `mtr` field key used with `-o`.
    pub key: char,
    /// The name of the column, which is also the name of its capture group.
    pub name: &'static str,
    suffix: &'static str,
}

impl Column {
    const fn new(key: char, name: &'static str) -> Self {
        Self {
            key,
            name,
            suffix: "",
        }
    }

    const fn with_suffix(key: char, name: &'static str, suffix: &'static str) -> Self {
        Self { key, name, suffix }
    }
}

/// The statistic columns requested from `mtr`, in report order.
///
/// Each group is rendered as one space separated word of the `-o` argument
/// and the line grammar captures the columns in exactly this order.
pub const COLUMNS: [[Column; 4]; 3] = [
    [
        Column::with_suffix('L', "loss", "%?"),
        Column::new('S', "snt"),
        Column::new('D', "drop"),
        Column::new('R', "rcv"),
    ],
    [
        Column::new('N', "last"),
        Column::new('B', "best"),
        Column::new('A', "avg"),
        Column::new('W', "wrst"),
    ],
    [
        Column::new('J', "jttr"),
        Column::new('M', "javg"),
        Column::new('X', "jmax"),
        Column::new('I', "jint"),
    ],
];

/// The value of the `-o` argument which selects and orders the report columns.
#[must_use]
pub fn field_order() -> String {
    COLUMNS
        .iter()
        .map(|group| group.iter().map(|column| column.key).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A statistic value as written in the report.
///
/// The text is kept verbatim, `mtr` may emit placeholders in place of a
/// number.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Stat(String);

impl Stat {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as a float, if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// The value as an unsigned integer, if it is integral.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<&str> for Stat {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl Display for Stat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single hop of the report.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Hop {
    /// The 1-based hop number as reported.
    pub hop_id: u32,
    /// The hop address, hostname or placeholder such as `???`.
    pub host: String,
    /// Packet loss percentage.
    pub loss: Stat,
    /// Packets sent.
    pub snt: Stat,
    /// Packets dropped.
    pub drop: Stat,
    /// Packets received.
    pub rcv: Stat,
    /// Round trip time of the most recent probe (ms).
    pub last: Stat,
    /// Best round trip time (ms).
    pub best: Stat,
    /// Average round trip time (ms).
    pub avg: Stat,
    /// Worst round trip time (ms).
    pub wrst: Stat,
    /// Current jitter (ms).
    pub jttr: Stat,
    /// Mean jitter (ms).
    pub javg: Stat,
    /// Worst jitter (ms).
    pub jmax: Stat,
    /// Interarrival jitter (ms).
    pub jint: Stat,
}

impl Hop {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let stat = |name: &str| Stat::from(&caps[name]);
        Some(Self {
            hop_id: caps["hop_id"].parse().ok()?,
            host: String::from(&caps["host"]),
            loss: stat("loss"),
            snt: stat("snt"),
            drop: stat("drop"),
            rcv: stat("rcv"),
            last: stat("last"),
            best: stat("best"),
            avg: stat("avg"),
            wrst: stat("wrst"),
            jttr: stat("jttr"),
            javg: stat("javg"),
            jmax: stat("jmax"),
            jint: stat("jint"),
        })
    }
}

/// The parsed output of a successful run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Report {
    /// The captured standard output, verbatim.
    pub raw: String,
    /// The hops, in the order they appear in the output.
    pub hops: Vec<Hop>,
    /// The number of non-blank lines which did not match the hop grammar.
    pub skipped: usize,
}

/// Parse the output of `mtr` in report mode.
///
/// Lines which do not match the hop grammar (the banner, the column header
/// and blank lines) are skipped.
#[instrument(skip_all, level = "trace")]
#[must_use]
pub fn parse(output: &str) -> Report {
    let mut hops = Vec::new();
    let mut skipped = 0;
    for line in output.lines() {
        match grammar()
            .captures(line)
            .and_then(|caps| Hop::from_captures(&caps))
        {
            Some(hop) => hops.push(hop),
            None if line.trim().is_empty() => {}
            None => {
                tracing::trace!(line, "skipping unmatched line");
                skipped += 1;
            }
        }
    }
    tracing::debug!(hops = hops.len(), skipped, "parsed report");
    Report {
        raw: String::from(output),
        hops,
        skipped,
    }
}

/// The hop line grammar, built from [`COLUMNS`].
fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(&pattern()).expect("valid hop grammar"))
}

fn pattern() -> String {
    let mut stats = String::new();
    for Column { name, suffix, .. } in COLUMNS.iter().flatten() {
        let _ = write!(stats, r"\s+(?P<{name}>[a-z0-9.]+){suffix}");
    }
    format!(r"(?i)^\s*(?P<hop_id>[0-9]+)[.|\-\s]+(?P<host>[a-z0-9._:?\-]+){stats}\s*$")
}

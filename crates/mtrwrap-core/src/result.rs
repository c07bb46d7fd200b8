use crate::report::{self, Report};
use crate::runner::Completion;
use crate::types::ExitCode;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// The outcome of a trace.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    /// The probing utility exited with code zero.
    Success,
    /// The probing utility exited with a non-zero code.
    Failed,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The raw error output of a failed trace.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Failure {
    /// Everything the probing utility wrote to standard error.
    pub raw: String,
}

/// The payload of a trace result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Results {
    /// The parsed report of a successful trace.
    Report(Report),
    /// The error output of a failed trace.
    Failure(Failure),
}

impl Results {
    /// The unparsed text: standard output on success, standard error on failure.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Report(report) => &report.raw,
            Self::Failure(failure) => &failure.raw,
        }
    }
}

/// The result of a trace.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TraceResult {
    /// The arguments the probing utility was run with.
    pub args: Vec<String>,
    /// The exit code of the probing utility.
    pub code: ExitCode,
    /// Whether the trace succeeded.
    pub status: Status,
    /// The time taken by the probing utility.
    pub elapsed: Duration,
    /// The parsed report or the raw error output.
    pub results: Results,
}

impl TraceResult {
    /// Assemble a result from a completed run.
    ///
    /// Standard output is parsed only on a zero exit code, otherwise it is
    /// discarded and standard error is kept instead.
    #[must_use]
    pub fn from_completion(args: Vec<String>, completion: Completion) -> Self {
        if completion.code.is_success() {
            Self::success(args, &completion)
        } else {
            Self::failure(args, completion)
        }
    }

    /// Assemble the result of a successful run by parsing its standard output.
    #[must_use]
    pub fn success(args: Vec<String>, completion: &Completion) -> Self {
        Self {
            args,
            code: completion.code,
            status: Status::Success,
            elapsed: completion.elapsed,
            results: Results::Report(report::parse(&completion.stdout)),
        }
    }

    /// Assemble the result of a failed run, keeping only its standard error.
    #[must_use]
    pub fn failure(args: Vec<String>, completion: Completion) -> Self {
        Self {
            args,
            code: completion.code,
            status: Status::Failed,
            elapsed: completion.elapsed,
            results: Results::Failure(Failure {
                raw: completion.stderr,
            }),
        }
    }

    /// The parsed report, if the trace succeeded.
    #[must_use]
    pub fn as_report(&self) -> Option<&Report> {
        match &self.results {
            Results::Report(report) => Some(report),
            Results::Failure(_) => None,
        }
    }

    /// The error output, if the trace failed.
    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match &self.results {
            Results::Report(_) => None,
            Results::Failure(failure) => Some(failure),
        }
    }
}

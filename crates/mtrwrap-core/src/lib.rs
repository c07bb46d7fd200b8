//! mtrwrap - run `mtr` and parse its report.
//!
//! This crate runs the `mtr` utility in wide report mode against a single
//! IPv4 or IPv6 target, captures its output and parses each hop line into a
//! typed [`Hop`] record.
//!
//! A single trace is one child process.  The target is validated before
//! anything is spawned, the arguments are derived from the target address
//! family and the [`Config`], and the outcome is either a parsed [`Report`]
//! or the raw error output of the utility.
//!
//! # Example
//!
//! The following example traces a target with the default configuration and
//! prints each hop:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! use mtrwrap_core::Builder;
//!
//! let result = Builder::new("192.0.2.1").build()?.traceroute().await?;
//! if let Some(report) = result.as_report() {
//!     for hop in &report.hops {
//!         println!("{:>3} {:<40} {:>6} {:>6}", hop.hop_id, hop.host, hop.loss, hop.avg);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A failed run carries the [`TraceResult`] with the standard error of the
//! utility:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! use mtrwrap_core::{Builder, Error};
//!
//! match Builder::new("2001:db8::1").build()?.traceroute().await {
//!     Ok(result) => println!("{} hops", result.as_report().map_or(0, |r| r.hops.len())),
//!     Err(Error::ProbeFailed(result)) => eprintln!("{}", result.results.raw()),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`MtrWrapper`].
//! - [`MtrWrapper::traceroute`] - Run a single trace.
//! - [`MtrWrapper::traceroute_with`] - Run a single trace with a completion handler.
//! - [`MtrWrapper::spawn_with`] - Run a single trace on a new task.
//! - [`parse`] - Parse a captured report.

mod addr;
mod builder;
mod command;
mod config;
mod error;
mod report;
mod result;
mod runner;
mod types;
mod wrapper;

pub use addr::{classify, AddrFamily};
pub use builder::Builder;
pub use command::build as build_args;
pub use config::{defaults, Config};
pub use error::{Error, Result};
pub use report::{field_order, parse, Column, Hop, Report, Stat, COLUMNS};
pub use result::{Failure, Results, Status, TraceResult};
pub use runner::{Completion, ProcessRunner, Runner};
pub use types::{ExitCode, PacketSize};
pub use wrapper::MtrWrapper;

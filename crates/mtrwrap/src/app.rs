use crate::config::{LogFormat, LogSpanEvents, Mode, MtrwConfig};
use crate::report;
use anyhow::anyhow;
use itertools::Itertools;
use mtrwrap_core::{Builder, Error, MtrWrapper, PacketSize, TraceResult};
use std::io;
use tracing_subscriber::fmt::format::FmtSpan;

/// Run the mtrw application.
pub fn run_mtrw(cfg: &MtrwConfig) -> anyhow::Result<()> {
    configure_logging(cfg);
    let wrapper = make_wrapper(cfg)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match runtime.block_on(wrapper.traceroute()) {
        Ok(result) => {
            tracing::debug!(
                command = %command_line(&cfg.program, &result),
                hops = result.as_report().map_or(0, |report| report.hops.len()),
                "trace complete"
            );
            render(cfg, &result)
        }
        Err(Error::ProbeFailed(result)) => {
            tracing::debug!(command = %command_line(&cfg.program, &result), "trace failed");
            if cfg.mode == Mode::Json {
                report::json::report(&cfg.target, &result, io::stdout().lock())?;
            }
            Err(anyhow!(
                "{} exited with code {}: {}",
                cfg.program,
                result.code,
                result.results.raw().trim_end()
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// Build the wrapper for the configured target.
fn make_wrapper(cfg: &MtrwConfig) -> anyhow::Result<MtrWrapper> {
    Ok(Builder::new(&cfg.target)
        .packet_len(PacketSize(cfg.packet_size))
        .resolve_dns(cfg.resolve_dns)
        .program(&cfg.program)
        .build()?)
}

/// Write the report of a successful trace to stdout.
fn render(cfg: &MtrwConfig, result: &TraceResult) -> anyhow::Result<()> {
    let stdout = io::stdout().lock();
    match cfg.mode {
        Mode::Pretty => report::table::report_pretty(result, stdout),
        Mode::Markdown => report::table::report_md(result, stdout),
        Mode::Csv => report::csv::report(&cfg.target, result, stdout),
        Mode::Json => report::json::report(&cfg.target, result, stdout),
        Mode::Raw => report::raw::report(result, stdout),
    }
}

fn command_line(program: &str, result: &TraceResult) -> String {
    std::iter::once(program)
        .chain(result.args.iter().map(String::as_str))
        .map(|arg| {
            if arg.contains(' ') {
                format!("\"{arg}\"")
            } else {
                String::from(arg)
            }
        })
        .join(" ")
}

/// Logs are always written to stderr so they never interleave with a report.
fn configure_logging(cfg: &MtrwConfig) {
    if cfg.verbose {
        let fmt_span = match cfg.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match cfg.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .json()
                    .init();
            }
        }
    }
}

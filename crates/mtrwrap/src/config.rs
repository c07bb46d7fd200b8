use anyhow::anyhow;
use clap::ValueEnum;
use clap_complete::Shell;
use file::ConfigFile;
use mtrwrap_core::{classify, defaults};
use serde::Deserialize;

mod cmd;
mod constants;
mod file;

pub use cmd::Args;

/// The output mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Print a pretty text table of the hops.
    Pretty,
    /// Print a Markdown text table of the hops.
    Markdown,
    /// Print a CSV row for each hop.
    Csv,
    /// Print a JSON document of the trace result.
    Json,
    /// Print the report exactly as captured from mtr.
    Raw,
}

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// The action to perform.
#[derive(Debug, Eq, PartialEq)]
pub enum MtrwAction {
    /// Run a trace.
    Run(MtrwConfig),
    /// Print a template toml config file and exit.
    PrintConfigTemplate,
    /// Generate shell completion and exit.
    PrintShellCompletions(Shell),
    /// Generate a man page and exit.
    PrintManPage,
}

impl MtrwAction {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        Ok(if args.print_config_template {
            Self::PrintConfigTemplate
        } else if let Some(shell) = args.generate {
            Self::PrintShellCompletions(shell)
        } else if args.generate_man {
            Self::PrintManPage
        } else {
            Self::Run(MtrwConfig::from(args)?)
        })
    }
}

/// Fully parsed and validated configuration.
#[derive(Debug, Eq, PartialEq)]
pub struct MtrwConfig {
    pub target: String,
    pub mode: Mode,
    pub packet_size: u16,
    pub resolve_dns: bool,
    pub program: String,
    pub verbose: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub log_span_events: LogSpanEvents,
}

impl MtrwConfig {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        let cfg_file = if let Some(cfg) = &args.config_file {
            file::read_config_file(cfg)?
        } else {
            file::read_default_config_file()?.unwrap_or_default()
        };
        Self::build_config(args, cfg_file)
    }

    fn build_config(args: Args, cfg_file: ConfigFile) -> anyhow::Result<Self> {
        let cfg_file_mtrw = cfg_file.mtrw.unwrap_or_default();
        let cfg_file_probe = cfg_file.probe.unwrap_or_default();
        let target = args
            .target
            .ok_or_else(|| anyhow!("a target must be provided"))?;
        let mode = cfg_layer(args.mode, cfg_file_mtrw.mode, constants::DEFAULT_MODE);
        let packet_size = cfg_layer(
            args.packet_size,
            cfg_file_probe.packet_size,
            defaults::DEFAULT_PACKET_LEN,
        );
        let resolve_dns = cfg_layer_bool_flag(
            args.resolve_dns,
            cfg_file_probe.resolve_dns,
            defaults::DEFAULT_RESOLVE_DNS,
        );
        let program = cfg_layer(
            args.program,
            cfg_file_probe.program,
            String::from(defaults::DEFAULT_PROGRAM),
        );
        let verbose = args.verbose;
        let log_format = cfg_layer(
            args.log_format,
            cfg_file_mtrw.log_format,
            constants::DEFAULT_LOG_FORMAT,
        );
        let log_filter = cfg_layer(
            args.log_filter,
            cfg_file_mtrw.log_filter,
            String::from(constants::DEFAULT_LOG_FILTER),
        );
        let log_span_events = cfg_layer(
            args.log_span_events,
            cfg_file_mtrw.log_span_events,
            constants::DEFAULT_LOG_SPAN_EVENTS,
        );
        validate_target(&target)?;
        validate_packet_size(packet_size)?;
        validate_program(&program)?;
        Ok(Self {
            target,
            mode,
            packet_size,
            resolve_dns,
            program,
            verbose,
            log_format,
            log_filter,
            log_span_events,
        })
    }
}

impl Default for MtrwConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            mode: constants::DEFAULT_MODE,
            packet_size: defaults::DEFAULT_PACKET_LEN,
            resolve_dns: defaults::DEFAULT_RESOLVE_DNS,
            program: String::from(defaults::DEFAULT_PROGRAM),
            verbose: false,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
            log_span_events: constants::DEFAULT_LOG_SPAN_EVENTS,
        }
    }
}

fn cfg_layer<T>(fst: Option<T>, snd: Option<T>, def: T) -> T {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => val,
        (None, None) => def,
    }
}

const fn cfg_layer_bool_flag(fst: bool, snd: Option<bool>, default: bool) -> bool {
    match (fst, snd) {
        (true, _) => true,
        (false, Some(val)) => val,
        (false, None) => default,
    }
}

/// Validate `target`.
fn validate_target(target: &str) -> anyhow::Result<()> {
    if classify(target).is_some() {
        Ok(())
    } else {
        Err(anyhow!("target ({target}) must be an IPv4 or IPv6 address"))
    }
}

/// Validate `packet_size`.
fn validate_packet_size(packet_size: u16) -> anyhow::Result<()> {
    if packet_size > 0 {
        Ok(())
    } else {
        Err(anyhow!(
            "packet-size ({packet_size}) must be greater than zero"
        ))
    }
}

/// Validate `program`.
fn validate_program(program: &str) -> anyhow::Result<()> {
    if program.trim().is_empty() {
        Err(anyhow!("program must not be empty"))
    } else {
        Ok(())
    }
}

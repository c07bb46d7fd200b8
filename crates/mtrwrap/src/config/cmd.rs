use crate::config::{LogFormat, LogSpanEvents, Mode};
use clap::builder::Styles;
use clap::Parser;
use clap_complete::Shell;

/// Trace the route to an IP address with mtr and report per-hop statistics
#[derive(Parser, Debug)]
#[command(name = "mtrw", author, version, about, long_about = None, arg_required_else_help(true), styles=Styles::styled())]
pub struct Args {
    /// The IPv4 or IPv6 address to trace
    #[arg(required_unless_present_any(["print_config_template", "generate", "generate_man"]))]
    pub target: Option<String>,

    /// Config file
    #[arg(short = 'c', long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<String>,

    /// Output mode [default: pretty]
    #[arg(value_enum, short = 'm', long)]
    pub mode: Option<Mode>,

    /// The size of each probe packet in bytes [default: 60]
    #[arg(short = 's', long)]
    pub packet_size: Option<u16>,

    /// Allow mtr to resolve hop addresses to hostnames [default: false]
    #[arg(long)]
    pub resolve_dns: bool,

    /// The mtr executable [default: mtr]
    #[arg(long, value_hint = clap::ValueHint::CommandName)]
    pub program: Option<String>,

    /// Enable verbose debug logging to stderr
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// The debug log format [default: pretty]
    #[arg(value_enum, long)]
    pub log_format: Option<LogFormat>,

    /// The debug log filter [default: mtrwrap=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// How to debug log event spans [default: off]
    #[arg(value_enum, long)]
    pub log_span_events: Option<LogSpanEvents>,

    /// Generate shell completion
    #[arg(long)]
    pub generate: Option<Shell>,

    /// Generate ROFF man page
    #[arg(long)]
    pub generate_man: bool,

    /// Print a template toml config file and exit
    #[arg(long)]
    pub print_config_template: bool,
}

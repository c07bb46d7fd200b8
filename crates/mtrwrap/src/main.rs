#![allow(clippy::struct_excessive_bools)]

use crate::config::MtrwAction;
use clap::Parser;
use config::Args;

mod app;
mod config;
mod print;
mod report;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    match MtrwAction::from(args)? {
        MtrwAction::Run(cfg) => app::run_mtrw(&cfg)?,
        MtrwAction::PrintConfigTemplate => print::print_config_template(),
        MtrwAction::PrintManPage => print::print_man_page()?,
        MtrwAction::PrintShellCompletions(shell) => print::print_shell_completions(shell)?,
    }
    Ok(())
}

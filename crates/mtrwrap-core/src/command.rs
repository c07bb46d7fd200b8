use crate::addr::AddrFamily;
use crate::config::Config;
use crate::report;

/// Build the argument vector for running `mtr` against `target`.
///
/// The arguments are, in order:
///
/// - `-4` or `-6` to restrict probing to the address family of the target
/// - `--no-dns` unless DNS resolution is enabled
/// - `-o` with the report field order the parser expects
/// - `-r` for report mode
/// - `-w` for wide report mode
/// - `--psize` with the packet size
/// - the target itself
#[must_use]
pub fn build(family: AddrFamily, config: &Config, target: &str) -> Vec<String> {
    let mut args = vec![String::from(family.flag())];
    if !config.resolve_dns {
        args.push(String::from("--no-dns"));
    }
    args.push(String::from("-o"));
    args.push(report::field_order());
    args.push(String::from("-r"));
    args.push(String::from("-w"));
    args.push(String::from("--psize"));
    args.push(config.packet_len.to_string());
    args.push(String::from(target));
    args
}

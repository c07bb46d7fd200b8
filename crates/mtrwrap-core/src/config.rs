use crate::types::PacketSize;

/// Default values for configuration.
pub mod defaults {
    /// The default value for `packet-len`.
    pub const DEFAULT_PACKET_LEN: u16 = 60;

    /// The default value for `resolve-dns`.
    pub const DEFAULT_RESOLVE_DNS: bool = false;

    /// The default probing utility executable.
    pub const DEFAULT_PROGRAM: &str = "mtr";
}

/// Options for running the probing utility.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// The size of each probe packet, in bytes.
    pub packet_len: PacketSize,
    /// Whether hop addresses may be resolved to hostnames.
    pub resolve_dns: bool,
    /// The probing utility executable, either a name found on `PATH` or a path.
    pub program: String,
}

impl Config {
    /// Create a `Config`.
    #[must_use]
    pub fn new(packet_len: PacketSize, resolve_dns: bool, program: impl Into<String>) -> Self {
        Self {
            packet_len,
            resolve_dns,
            program: program.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packet_len: PacketSize(defaults::DEFAULT_PACKET_LEN),
            resolve_dns: defaults::DEFAULT_RESOLVE_DNS,
            program: String::from(defaults::DEFAULT_PROGRAM),
        }
    }
}

use std::fmt::{Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};

/// The address family of a target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AddrFamily {
    /// Internet Protocol v4.
    Ipv4,
    /// Internet Protocol v6.
    Ipv6,
}

impl AddrFamily {
    /// The `mtr` flag which restricts probing to this address family.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Ipv4 => "-4",
            Self::Ipv6 => "-6",
        }
    }
}

impl Display for AddrFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "ipv4"),
            Self::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Classify a target as an IPv4 or IPv6 literal.
///
/// Returns `None` for anything else, including hostnames and the empty
/// string.
///
/// An IPv4 literal is exactly four dot separated decimal octets in the range
/// 0-255.  An IPv6 literal follows the standard textual representation,
/// including the compressed (`::`) and embedded IPv4 (`::ffff:192.0.2.1`)
/// forms.
#[must_use]
pub fn classify(target: &str) -> Option<AddrFamily> {
    if target.parse::<Ipv4Addr>().is_ok() {
        Some(AddrFamily::Ipv4)
    } else if target.parse::<Ipv6Addr>().is_ok() {
        Some(AddrFamily::Ipv6)
    } else {
        None
    }
}

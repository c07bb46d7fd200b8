use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::PacketSize;
use crate::MtrWrapper;

/// Build a wrapper.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use mtrwrap_core::{Builder, PacketSize};
///
/// let wrapper = Builder::new("192.0.2.1")
///     .packet_len(PacketSize(128))
///     .resolve_dns(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`MtrWrapper`] - Run a single trace against a target.
#[derive(Debug)]
pub struct Builder {
    target: String,
    packet_len: PacketSize,
    resolve_dns: bool,
    program: String,
}

impl Builder {
    /// Build a wrapper builder for a given target.
    ///
    /// The target is not validated until a trace is run.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        let Config {
            packet_len,
            resolve_dns,
            program,
        } = Config::default();
        Self {
            target: target.into(),
            packet_len,
            resolve_dns,
            program,
        }
    }

    /// Set the probe packet size, in bytes.
    ///
    /// If not set then 60 will be used.
    #[must_use]
    pub fn packet_len(self, packet_len: PacketSize) -> Self {
        Self { packet_len, ..self }
    }

    /// Set whether hop addresses may be resolved to hostnames.
    #[must_use]
    pub fn resolve_dns(self, resolve_dns: bool) -> Self {
        Self {
            resolve_dns,
            ..self
        }
    }

    /// Set the probing utility executable.
    ///
    /// If not set then `mtr` is looked up on `PATH`.
    #[must_use]
    pub fn program(self, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..self
        }
    }

    /// Build the wrapper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadConfig`] if the packet size is zero or the program
    /// is empty.
    pub fn build(self) -> Result<MtrWrapper> {
        if self.packet_len.0 == 0 {
            return Err(Error::BadConfig("packet_len must be positive".into()));
        }
        if self.program.trim().is_empty() {
            return Err(Error::BadConfig("program may not be empty".into()));
        }
        Ok(MtrWrapper::new(
            self.target,
            Config::new(self.packet_len, self.resolve_dns, self.program),
        ))
    }
}

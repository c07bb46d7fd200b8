use crate::config::{LogFormat, LogSpanEvents, Mode};
use anyhow::Context;
use encoding_rs_io::DecodeReaderBytes;
use etcetera::BaseStrategy;
use mtrwrap_core::defaults;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "mtrw.toml";
const DEFAULT_HIDDEN_CONFIG_FILE: &str = ".mtrw.toml";

/// Read the config from the default location of user config for the platform.
///
/// Returns the parsed `Some(ConfigFile)` if the config file exists, `None` otherwise.
///
/// mtrw will attempt to locate a `mtrw.toml` or `.mtrw.toml` config file in
/// one of the following locations:
///     - the current directory
///     - the user home directory
///     - the user config directory: `$XDG_CONFIG_HOME` or `~/.config` (Unix), `%APPDATA%` (Windows)
///     - the app config directory: the `mtrw` sub directory of the above
///
/// Only the first config file found is used.
pub fn read_default_config_file() -> anyhow::Result<Option<ConfigFile>> {
    use etcetera::base_strategy as base;
    if let Some(file) = read_files("")? {
        return Ok(Some(file));
    }
    let basedirs = base::choose_base_strategy()?;
    let dirs = [
        basedirs.home_dir().to_path_buf(),
        basedirs.config_dir(),
        basedirs.config_dir().join("mtrw"),
    ];
    for dir in dirs {
        if let Some(file) = read_files(dir)? {
            return Ok(Some(file));
        }
    }
    Ok(None)
}

/// Read the config from the given path.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ConfigFile> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("config file not found: {}", path.as_ref().display()))?;
    let mut decoder = DecodeReaderBytes::new(BufReader::new(file));
    let mut dest = String::new();
    decoder.read_to_string(&mut dest)?;
    toml::from_str(&dest)
        .with_context(|| format!("invalid config file: {}", path.as_ref().display()))
}

fn read_files<P: AsRef<Path>>(dir: P) -> anyhow::Result<Option<ConfigFile>> {
    for name in [DEFAULT_CONFIG_FILE, DEFAULT_HIDDEN_CONFIG_FILE] {
        let path = dir.as_ref().join(name);
        if path.exists() {
            tracing::debug!(path = %path.display(), "found config file");
            return Ok(Some(read_config_file(path)?));
        }
    }
    Ok(None)
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub mtrw: Option<ConfigMtrw>,
    pub probe: Option<ConfigProbe>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            mtrw: Some(ConfigMtrw::default()),
            probe: Some(ConfigProbe::default()),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigMtrw {
    pub mode: Option<Mode>,
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
    pub log_span_events: Option<LogSpanEvents>,
}

impl Default for ConfigMtrw {
    fn default() -> Self {
        Self {
            mode: Some(super::constants::DEFAULT_MODE),
            log_format: Some(super::constants::DEFAULT_LOG_FORMAT),
            log_filter: Some(String::from(super::constants::DEFAULT_LOG_FILTER)),
            log_span_events: Some(super::constants::DEFAULT_LOG_SPAN_EVENTS),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigProbe {
    pub packet_size: Option<u16>,
    pub resolve_dns: Option<bool>,
    pub program: Option<String>,
}

impl Default for ConfigProbe {
    fn default() -> Self {
        Self {
            packet_size: Some(defaults::DEFAULT_PACKET_LEN),
            resolve_dns: Some(defaults::DEFAULT_RESOLVE_DNS),
            program: Some(String::from(defaults::DEFAULT_PROGRAM)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_sample() {
        let config: ConfigFile =
            toml::from_str(include_str!("../../mtrw-config-sample.toml")).unwrap();
        pretty_assertions::assert_eq!(ConfigFile::default(), config);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ConfigFile = toml::from_str("[probe]\npacket-size = 128\n").unwrap();
        let expected = ConfigFile {
            mtrw: None,
            probe: Some(ConfigProbe {
                packet_size: Some(128),
                resolve_dns: None,
                program: None,
            }),
        };
        pretty_assertions::assert_eq!(expected, config);
    }

    #[test]
    fn test_parse_unknown_field() {
        let config = toml::from_str::<ConfigFile>("[probe]\nmax-ttl = 30\n");
        assert!(config.is_err());
    }

    #[test]
    fn test_parse_unknown_mode() {
        let config = toml::from_str::<ConfigFile>("[mtrw]\nmode = \"tui\"\n");
        assert!(config.is_err());
    }

    #[test]
    fn test_read_missing_config_file() {
        let err = read_config_file("/nonexistent/mtrw.toml").unwrap_err();
        assert_eq!(
            "config file not found: /nonexistent/mtrw.toml",
            err.to_string()
        );
    }
}

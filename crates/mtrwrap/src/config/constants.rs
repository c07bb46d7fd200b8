use crate::config::{LogFormat, LogSpanEvents, Mode};

/// The default value for `mode`.
pub const DEFAULT_MODE: Mode = Mode::Pretty;

/// The default value for `log-format`.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Pretty;

/// The default value for `log-span-events`.
pub const DEFAULT_LOG_SPAN_EVENTS: LogSpanEvents = LogSpanEvents::Off;

/// The default value for `log-filter`.
pub const DEFAULT_LOG_FILTER: &str = "mtrwrap=debug";

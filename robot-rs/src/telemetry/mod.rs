use dashmap::DashMap;

/// A value published to a telemetry channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
  Double(f64),
  Boolean(bool),
  String(String),
}

impl From<f64> for TelemetryValue {
  fn from(value: f64) -> Self { Self::Double(value) }
}

impl From<bool> for TelemetryValue {
  fn from(value: bool) -> Self { Self::Boolean(value) }
}

impl From<String> for TelemetryValue {
  fn from(value: String) -> Self { Self::String(value) }
}

impl<'a> From<&'a str> for TelemetryValue {
  fn from(value: &'a str) -> Self { Self::String(value.to_owned()) }
}

impl std::fmt::Display for TelemetryValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TelemetryValue::Double(v) => write!(f, "{}", v),
      TelemetryValue::Boolean(v) => write!(f, "{}", v),
      TelemetryValue::String(v) => write!(f, "{}", v),
    }
  }
}

/// Anywhere telemetry can be written to: a dashboard table, a signal log, or a test double.
///
/// Writes must not block the caller's tick; sinks that can fail are expected to drop the write.
pub trait TelemetrySink: Send + Sync {
  fn write(&self, channel: &str, value: TelemetryValue);
}

/// In-memory table holding the latest value of each channel.
#[derive(Debug, Default)]
pub struct NetworkTable {
  entries: DashMap<String, TelemetryValue>,
}

impl NetworkTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, channel: &str) -> Option<TelemetryValue> {
    self.entries.get(channel).map(|e| e.value().clone())
  }

  pub fn get_number(&self, channel: &str) -> Option<f64> {
    match self.get(channel)? {
      TelemetryValue::Double(v) => Some(v),
      _ => None
    }
  }

  pub fn get_string(&self, channel: &str) -> Option<String> {
    match self.get(channel)? {
      TelemetryValue::String(v) => Some(v),
      _ => None
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl TelemetrySink for NetworkTable {
  fn write(&self, channel: &str, value: TelemetryValue) {
    self.entries.insert(channel.to_owned(), value);
  }
}

/// Forwards every write to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogSink {
  pub level: log::Level,
}

impl Default for LogSink {
  fn default() -> Self {
    Self { level: log::Level::Debug }
  }
}

impl TelemetrySink for LogSink {
  fn write(&self, channel: &str, value: TelemetryValue) {
    log::log!(target: "telemetry", self.level, "{} = {}", channel, value);
  }
}

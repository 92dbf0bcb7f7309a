/// Writes every enabled record to stderr, prefixed with its level
pub struct Logger;

impl log::Log for Logger {
  fn enabled(&self, metadata: &log::Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &log::Record) {
    if self.enabled(record.metadata()) {
      eprintln!("[{}] {}", record.level(), record.args())
    }
  }

  fn flush(&self) {}
}

/// Install `Logger` as the global logger, only the first call has any effect
pub fn init(level: log::LevelFilter) {
  if log::set_logger(&Logger).is_ok() {
    log::set_max_level(level);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use log::Log;

  #[test]
  fn respects_max_level() {
    init(log::LevelFilter::Warn);
    let error = log::Metadata::builder().level(log::Level::Error).build();
    let trace = log::Metadata::builder().level(log::Level::Trace).build();
    assert!(Logger.enabled(&error));
    assert!(!Logger.enabled(&trace));
  }
}

use std::time::Duration;

use crate::vm::{Config, Pacing};

pub const USAGE: &str = "\
Usage: main [OPTIONS...] <FILE>

Runs an LS-8 program, one binary byte per line.

Options:
  --tick <MS>   wait MS milliseconds between cycles
  --verbose     log loading and halting
  --trace       log every fetched instruction
  -h, --help    print this message";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum OptionsError {
  #[error("help requested")]
  Help,

  #[error("missing program file")]
  MissingFile,

  #[error("`--tick` expects a number of milliseconds, found `{0}`")]
  InvalidTick(String),

  #[error("unknown option `{0}`")]
  UnknownOption(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  pub file: String,
  pub tick: Option<Duration>,
  pub log_level: log::LevelFilter,
}

impl Options {
  /// Parse the arguments following the binary name
  pub fn from_args(args: &[&str]) -> Result<Self, OptionsError> {
    if args.contains(&"--help") || args.contains(&"-h") {
      return Err(OptionsError::Help);
    }

    let mut file = None;
    let mut tick = None;
    let mut log_level = log::LevelFilter::Warn;
    let mut args = args.iter();
    while let Some(&arg) = args.next() {
      match arg {
        "--tick" => {
          let value = args.next().copied().unwrap_or_default();
          let ms = value
            .parse::<u64>()
            .map_err(|_| OptionsError::InvalidTick(value.to_owned()))?;
          tick = Some(Duration::from_millis(ms));
        }
        "--verbose" => log_level = log_level.max(log::LevelFilter::Debug),
        "--trace" => log_level = log::LevelFilter::Trace,
        flag if flag.starts_with('-') => {
          return Err(OptionsError::UnknownOption(flag.to_owned()))
        }
        path => file = Some(path.to_owned()),
      }
    }

    Ok(Self {
      file: file.ok_or(OptionsError::MissingFile)?,
      tick,
      log_level,
    })
  }

  pub fn config(&self) -> Config {
    Config {
      pacing: match self.tick {
        Some(period) => Pacing::Tick(period),
        None => Pacing::FreeRunning,
      },
      ..Config::default()
    }
  }
}

use std::fs;
use std::path::Path;

/// A failure while reading a program image
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
  #[error("failed to read program: {0}")]
  Io(#[from] std::io::Error),

  #[error("line {line}: expected eight binary digits, found `{content}`")]
  InvalidLine { line: usize, content: String },
}

/// An immutable program image, loaded into memory starting at address 0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  bytes: Vec<u8>,
}

impl Program {
  /// Parse the `.ls8` text format.
  ///
  /// Every line holds a single byte written in binary. A `#` starts a comment
  /// that runs to the end of the line, and lines left empty are skipped:
  ///
  /// ```text
  /// 00000100 # LDI R0,8
  /// 00000000
  /// 00001000
  /// ```
  pub fn parse(source: &str) -> Result<Self, LoadError> {
    let mut bytes = Vec::new();
    for (index, raw) in source.lines().enumerate() {
      let code = match raw.split_once('#') {
        Some((code, _comment)) => code,
        None => raw,
      }
      .trim();
      if code.is_empty() {
        continue;
      }
      let invalid = || LoadError::InvalidLine {
        line: index + 1,
        content: code.to_owned(),
      };
      if code.len() != 8 || !code.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(invalid());
      }
      let byte = u8::from_str_radix(code, 2).map_err(|_| invalid())?;
      bytes.push(byte);
    }
    Ok(Self { bytes })
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
    let source = fs::read_to_string(path)?;
    Self::parse(&source)
  }

  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

impl From<Vec<u8>> for Program {
  fn from(bytes: Vec<u8>) -> Self {
    Self { bytes }
  }
}

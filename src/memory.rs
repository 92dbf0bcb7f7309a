use crate::vm::{Error, Result};

/// Default capacity of the LS-8 address space
pub const RAM_SIZE: usize = 256;

/// Byte addressable storage a `Cpu` fetches from and writes to
pub trait Memory {
  fn capacity(&self) -> usize;

  fn read(&self, address: usize) -> Result<u8>;

  fn write(&mut self, address: usize, value: u8) -> Result<()>;
}

/// A `Ram` is a fixed block of zeroed bytes, it never grows after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ram {
  cells: Vec<u8>,
}

impl Ram {
  /// Create the standard 256 byte memory
  pub fn new() -> Self {
    Self::with_capacity(RAM_SIZE)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      cells: vec![0; capacity],
    }
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.cells
  }
}

impl Default for Ram {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Vec<u8>> for Ram {
  fn from(cells: Vec<u8>) -> Self {
    Self { cells }
  }
}

impl Memory for Ram {
  fn capacity(&self) -> usize {
    self.cells.len()
  }

  fn read(&self, address: usize) -> Result<u8> {
    self
      .cells
      .get(address)
      .copied()
      .ok_or(Error::MemoryOutOfBounds { address })
  }

  fn write(&mut self, address: usize, value: u8) -> Result<()> {
    let cell = self
      .cells
      .get_mut(address)
      .ok_or(Error::MemoryOutOfBounds { address })?;
    *cell = value;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_is_zeroed() {
    let ram = Ram::new();
    assert_eq!(ram.capacity(), RAM_SIZE);
    assert!(ram.as_bytes().iter().all(|&b| b == 0));
  }

  #[test]
  fn write_then_read() {
    let mut ram = Ram::new();
    ram.write(0xF7, 42).unwrap();
    assert_eq!(ram.read(0xF7).unwrap(), 42);
    assert_eq!(ram.read(0xF6).unwrap(), 0);
  }

  #[test]
  fn out_of_bounds() {
    let mut ram = Ram::with_capacity(4);
    assert!(matches!(
      ram.read(4),
      Err(Error::MemoryOutOfBounds { address: 4 })
    ));
    assert!(matches!(
      ram.write(300, 1),
      Err(Error::MemoryOutOfBounds { address: 300 })
    ));
    assert_eq!(ram.as_bytes(), &[0, 0, 0, 0]);
  }

  #[test]
  fn from_vec() {
    let ram: Ram = vec![1, 2, 3].into();
    assert_eq!(ram.capacity(), 3);
    assert_eq!(ram.read(2).unwrap(), 3);
  }
}

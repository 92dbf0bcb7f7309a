/// Instructions understood by the machine.
///
/// Each variant is the full instruction byte as it appears in memory, operands
/// follow it directly at `pc + 1`, `pc + 2`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// Stops the machine.
  ///
  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Halt = 0b0001_1011,

  /// Loads an immediate value into a register.
  ///
  /// | Operation      | Semantics/RTL | Assembly     |
  /// |----------------|---------------|--------------|
  /// | Load Immediate | `r[a] ← vv`   | `LDI ra, vv` |
  LoadImmediate = 0b0000_0100,

  /// | Operation | Semantics/RTL                 | Assembly     |
  /// |-----------|-------------------------------|--------------|
  /// | Multiply  | `r[a] ← (r[a] × r[b]) & 0xFF` | `MUL ra, rb` |
  Multiply = 0b0000_0101,

  /// Prints the numeric value of a register as a decimal.
  ///
  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Print     | `out ← r[a]`  | `PRN ra` |
  Print = 0b0000_0110,

  /// | Operation | Semantics/RTL                 | Assembly  |
  /// |-----------|-------------------------------|-----------|
  /// | Push      | `sp ← sp − 1; m[sp] ← r[a]`   | `PUSH ra` |
  Push = 0b0000_1010,

  /// | Operation | Semantics/RTL                 | Assembly |
  /// |-----------|-------------------------------|----------|
  /// | Pop       | `r[a] ← m[sp]; sp ← sp + 1`   | `POP ra` |
  Pop = 0b0000_0000,

  /// Pushes the address of the next instruction, then jumps.
  ///
  /// | Operation | Semantics/RTL                             | Assembly  |
  /// |-----------|-------------------------------------------|-----------|
  /// | Call      | `sp ← sp − 1; m[sp] ← pc + 2; pc ← r[a]`  | `CALL ra` |
  Call = 0b0000_1111,
}

impl Opcode {
  /// Number of operand bytes following the opcode
  pub const fn operands(self) -> usize {
    match self {
      Self::Halt => 0,
      Self::LoadImmediate | Self::Multiply => 2,
      Self::Print | Self::Push | Self::Pop | Self::Call => 1,
    }
  }

  /// Encoded length, opcode byte included
  pub const fn encoded_len(self) -> usize {
    1 + self.operands()
  }

  pub const fn mnemonic(self) -> &'static str {
    match self {
      Self::Halt => "HLT",
      Self::LoadImmediate => "LDI",
      Self::Multiply => "MUL",
      Self::Print => "PRN",
      Self::Push => "PUSH",
      Self::Pop => "POP",
      Self::Call => "CALL",
    }
  }
}

impl From<Opcode> for u8 {
  fn from(op: Opcode) -> Self {
    op as u8
  }
}

impl TryFrom<u8> for Opcode {
  /// The byte that did not decode
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      0b0001_1011 => Ok(Self::Halt),
      0b0000_0100 => Ok(Self::LoadImmediate),
      0b0000_0101 => Ok(Self::Multiply),
      0b0000_0110 => Ok(Self::Print),
      0b0000_1010 => Ok(Self::Push),
      0b0000_0000 => Ok(Self::Pop),
      0b0000_1111 => Ok(Self::Call),
      other => Err(other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [Opcode; 7] = [
    Opcode::Halt,
    Opcode::LoadImmediate,
    Opcode::Multiply,
    Opcode::Print,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Call,
  ];

  #[test]
  fn decodes_every_opcode() {
    for op in ALL {
      assert_eq!(Opcode::try_from(u8::from(op)), Ok(op));
    }
  }

  #[test]
  fn only_known_bytes_decode() {
    let known = (0..=255u8).filter(|b| Opcode::try_from(*b).is_ok()).count();
    assert_eq!(known, ALL.len());
    assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
  }

  #[test]
  fn lengths() {
    assert_eq!(Opcode::Halt.encoded_len(), 1);
    assert_eq!(Opcode::LoadImmediate.encoded_len(), 3);
    assert_eq!(Opcode::Multiply.encoded_len(), 3);
    assert_eq!(Opcode::Print.encoded_len(), 2);
    assert_eq!(Opcode::Push.encoded_len(), 2);
    assert_eq!(Opcode::Pop.encoded_len(), 2);
    assert_eq!(Opcode::Call.encoded_len(), 2);
  }
}

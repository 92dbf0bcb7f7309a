/// Operations the arithmetic logic unit knows how to perform.
///
/// Only multiplication is wired up for now, the rest of the LS-8 arithmetic
/// (`ADD`, `SUB`, `DIV`, `INC`, `DEC`, `CMP`) has no opcode in this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  /// `r[a] ← (r[a] × r[b]) mod 256`
  Mul,
}

/// Apply `op` to two register values, results wrap at 8 bits
pub fn apply(op: AluOp, a: u8, b: u8) -> u8 {
  match op {
    AluOp::Mul => a.wrapping_mul(b),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mul() {
    assert_eq!(apply(AluOp::Mul, 8, 9), 72);
    assert_eq!(apply(AluOp::Mul, 0, 255), 0);
    assert_eq!(apply(AluOp::Mul, 1, 255), 255);
  }

  #[test]
  fn mul_wraps() {
    // 200 × 200 = 40000 = 156 × 256 + 64
    assert_eq!(apply(AluOp::Mul, 200, 200), 64);
    assert_eq!(apply(AluOp::Mul, 16, 16), 0);
  }

  #[test]
  fn mul_matches_modular_product() {
    for a in (0..=255u8).step_by(7) {
      for b in (0..=255u8).step_by(11) {
        let expected = (a as u32 * b as u32 % 256) as u8;
        assert_eq!(apply(AluOp::Mul, a, b), expected);
      }
    }
  }
}

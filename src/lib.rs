//! Bare-bones emulator for the LS-8, an eight bit toy computer with eight
//! registers and 256 bytes of memory.
//!
//! Only a handful of instructions are understood: `HLT`, `LDI`, `MUL`, `PRN`,
//! `PUSH`, `POP` and `CALL`.

pub mod alu;
pub mod logger;
pub mod memory;
pub mod opcode;
pub mod options;
pub mod program;
pub mod vm;

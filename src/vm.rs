use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::alu::{self, AluOp};
use crate::memory::{Memory, Ram};
use crate::opcode::Opcode;
use crate::program::Program;

/// The type of a single register in our virtual machine
pub type Register = u8;

/// Number of general purpose registers, `R0` through `R7`
pub const REGISTER_COUNT: usize = 8;

/// `R7` holds the stack pointer by convention
pub const SP: usize = 7;

/// Initial stack pointer, the stack grows down from here
pub const STACK_TOP: u8 = 0xF8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Running,
  Halted,
}

/// How `Cpu::run` schedules consecutive cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
  /// Back to back, as fast as the host allows
  #[default]
  FreeRunning,
  /// Sleep for the given period after every cycle
  Tick(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  /// Value `R7` starts at, a `POP` may never move past it
  pub stack_top: u8,
  pub pacing: Pacing,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      stack_top: STACK_TOP,
      pacing: Pacing::FreeRunning,
    }
  }
}

/// An error that occurred during execution of instructions.
///
/// Every variant except `MachineHalted` halts the machine it came from.
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("invalid instruction at address {address}: {opcode:08b}")]
  InvalidInstruction { address: usize, opcode: u8 },

  #[error("memory access out of bounds at address {address}")]
  MemoryOutOfBounds { address: usize },

  #[error("operand at address {address} names register {index}, which does not exist")]
  InvalidRegister { address: usize, index: u8 },

  #[error("stack overflow, cannot push with stack pointer at {sp:#04x}")]
  StackOverflow { sp: u8 },

  #[error("stack underflow, cannot pop with stack pointer at {sp:#04x}")]
  StackUnderflow { sp: u8 },

  #[error("return address {address} does not fit in a byte")]
  ReturnAddressOverflow { address: usize },

  #[error("program of {size} bytes does not fit in {capacity} bytes of memory")]
  ProgramTooLarge { size: usize, capacity: usize },

  #[error("failed to write output: {0}")]
  Output(#[from] std::io::Error),

  #[error("machine is halted")]
  MachineHalted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The LS-8 processor.
///
/// Owns its registers and the memory it runs against. Nothing else changes the
/// program counter or the stack pointer.
#[derive(Debug)]
pub struct Cpu<M = Ram> {
  // program counter, address of the next instruction to fetch
  pc: usize,
  // instruction register, the last opcode fetched
  ir: u8,
  registers: [Register; REGISTER_COUNT],
  memory: M,
  config: Config,
  state: State,
}

impl Cpu<Ram> {
  /// A processor attached to a fresh 256 byte memory
  pub fn with_ram() -> Self {
    Self::new(Ram::new())
  }
}

impl<M> Cpu<M>
where
  M: Memory,
{
  pub fn new(memory: M) -> Self {
    Self::with_config(memory, Config::default())
  }

  pub fn with_config(memory: M, config: Config) -> Self {
    let mut registers = [0; REGISTER_COUNT];
    registers[SP] = config.stack_top;
    Self {
      pc: 0,
      ir: 0,
      registers,
      memory,
      config,
      state: State::Running,
    }
  }

  /// Store a single byte, useful for program loading
  pub fn poke(&mut self, address: usize, value: u8) -> Result<()> {
    self.memory.write(address, value)
  }

  /// Copy a program image into memory starting at address 0
  pub fn load(&mut self, program: &Program) -> Result<()> {
    let capacity = self.memory.capacity();
    if program.len() > capacity {
      return Err(Error::ProgramTooLarge {
        size: program.len(),
        capacity,
      });
    }
    for (address, &byte) in program.bytes().iter().enumerate() {
      self.poke(address, byte)?;
    }
    log::debug!("loaded {} bytes", program.len());
    Ok(())
  }

  /// Run a single fetch, decode, execute cycle.
  ///
  /// A fault halts the machine and is handed back, registers and memory are
  /// left as they were before the faulting instruction.
  pub fn step<W>(&mut self, out: &mut W) -> Result<State>
  where
    W: Write,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    let mut task = Task::new(self, out);
    if let Err(err) = task.run() {
      log::error!("{err}");
      self.state = State::Halted;
      return Err(err);
    }
    Ok(self.state)
  }

  /// Keep stepping until the machine halts or faults
  pub fn run<W>(&mut self, out: &mut W) -> Result<()>
  where
    W: Write,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    while self.step(out)? == State::Running {
      if let Pacing::Tick(period) = self.config.pacing {
        thread::sleep(period);
      }
    }
    Ok(())
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn ir(&self) -> u8 {
    self.ir
  }

  pub fn register(&self, index: usize) -> Option<Register> {
    self.registers.get(index).copied()
  }

  pub fn registers(&self) -> &[Register; REGISTER_COUNT] {
    &self.registers
  }

  pub fn sp(&self) -> u8 {
    self.registers[SP]
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn memory(&self) -> &M {
    &self.memory
  }

  pub fn into_memory(self) -> M {
    self.memory
  }
}

impl Default for Cpu<Ram> {
  fn default() -> Self {
    Self::with_ram()
  }
}

struct Task<'cpu, 'out, M, W> {
  cpu: &'cpu mut Cpu<M>,
  out: &'out mut W,
}

impl<'cpu, 'out, M, W> Task<'cpu, 'out, M, W>
where
  M: Memory,
  W: Write,
{
  fn new(cpu: &'cpu mut Cpu<M>, out: &'out mut W) -> Self {
    Self { cpu, out }
  }

  #[inline]
  fn operand(&self, offset: usize) -> Result<u8> {
    self.cpu.memory.read(self.cpu.pc + offset)
  }

  fn register_operand(&self, offset: usize) -> Result<usize> {
    let index = self.operand(offset)?;
    if usize::from(index) >= REGISTER_COUNT {
      return Err(Error::InvalidRegister {
        address: self.cpu.pc + offset,
        index,
      });
    }
    Ok(usize::from(index))
  }

  // straight line instructions fall through to the next one
  fn advance(&mut self, op: Opcode) {
    self.cpu.pc += op.encoded_len();
  }

  // the stack pointer a push would leave behind
  fn pushed_sp(&self) -> Result<u8> {
    let sp = self.cpu.registers[SP];
    sp.checked_sub(1).ok_or(Error::StackOverflow { sp })
  }

  // r[index] as seen once the stack pointer has moved to `sp`
  fn register_with_sp(&self, index: usize, sp: u8) -> Register {
    if index == SP {
      sp
    } else {
      self.cpu.registers[index]
    }
  }

  fn run(&mut self) -> Result<()> {
    let pc = self.cpu.pc;
    let byte = self.cpu.memory.read(pc)?;
    self.cpu.ir = byte;
    let op = Opcode::try_from(byte)
      .map_err(|opcode| Error::InvalidInstruction { address: pc, opcode })?;
    log::trace!("{pc:3}: {byte:08b} {}", op.mnemonic());
    match op {
      Opcode::Halt => halt(self),
      Opcode::LoadImmediate => load_immediate(self)?,
      Opcode::Multiply => multiply(self)?,
      Opcode::Print => print(self)?,
      Opcode::Push => push(self)?,
      Opcode::Pop => pop(self)?,
      Opcode::Call => call(self)?,
    }
    Ok(())
  }
}

// (stop execution)
fn halt<M, W>(task: &mut Task<'_, '_, M, W>)
where
  M: Memory,
  W: Write,
{
  log::debug!("halted at address {}", task.cpu.pc);
  task.cpu.state = State::Halted;
}

// r[a] ← vv
fn load_immediate<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  let vv = task.operand(2)?;
  task.cpu.registers[a] = vv;
  task.advance(Opcode::LoadImmediate);
  Ok(())
}

// r[a] ← r[a] × r[b]
fn multiply<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  let b = task.register_operand(2)?;
  let registers = &mut task.cpu.registers;
  registers[a] = alu::apply(AluOp::Mul, registers[a], registers[b]);
  task.advance(Opcode::Multiply);
  Ok(())
}

// out ← r[a]
fn print<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  writeln!(task.out, "{}", task.cpu.registers[a])?;
  task.advance(Opcode::Print);
  Ok(())
}

// sp ← sp − 1; m[sp] ← r[a]
fn push<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  let sp = task.pushed_sp()?;
  let value = task.register_with_sp(a, sp);
  task.cpu.memory.write(usize::from(sp), value)?;
  task.cpu.registers[SP] = sp;
  task.advance(Opcode::Push);
  Ok(())
}

// r[a] ← m[sp]; sp ← sp + 1
fn pop<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  let sp = task.cpu.registers[SP];
  if sp >= task.cpu.config.stack_top {
    return Err(Error::StackUnderflow { sp });
  }
  let value = task.cpu.memory.read(usize::from(sp))?;
  // popping into R7 replaces the pointer before it is incremented
  let popped = if a == SP { value } else { sp };
  let next = popped
    .checked_add(1)
    .filter(|&next| next <= task.cpu.config.stack_top)
    .ok_or(Error::StackUnderflow { sp: popped })?;
  task.cpu.registers[a] = value;
  task.cpu.registers[SP] = next;
  task.advance(Opcode::Pop);
  Ok(())
}

// sp ← sp − 1; m[sp] ← pc + 2; pc ← r[a]
fn call<M, W>(task: &mut Task<'_, '_, M, W>) -> Result<()>
where
  M: Memory,
  W: Write,
{
  let a = task.register_operand(1)?;
  let sp = task.pushed_sp()?;
  let next = task.cpu.pc + Opcode::Call.encoded_len();
  let ret = u8::try_from(next).map_err(|_| Error::ReturnAddressOverflow { address: next })?;
  let target = task.register_with_sp(a, sp);
  task.cpu.memory.write(usize::from(sp), ret)?;
  task.cpu.registers[SP] = sp;
  task.cpu.pc = usize::from(target);
  Ok(())
}

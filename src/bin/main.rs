use std::io;
use std::process::ExitCode;

use emulator::logger;
use emulator::memory::Ram;
use emulator::options::{Options, OptionsError, USAGE};
use emulator::program::Program;
use emulator::vm::Cpu;

fn main() -> ExitCode {
  let args = std::env::args().skip(1).collect::<Vec<_>>();
  let args = args.iter().map(String::as_str).collect::<Vec<_>>();
  let opts = match Options::from_args(&args) {
    Ok(opts) => opts,
    Err(OptionsError::Help) => {
      println!("{USAGE}");
      return ExitCode::SUCCESS;
    }
    Err(err) => {
      eprintln!("{err}\n\n{USAGE}");
      return ExitCode::FAILURE;
    }
  };
  logger::init(opts.log_level);

  let program = match Program::from_file(&opts.file) {
    Ok(program) => program,
    Err(err) => {
      log::error!("{}: {err}", opts.file);
      return ExitCode::FAILURE;
    }
  };

  let mut cpu = Cpu::with_config(Ram::new(), opts.config());
  if let Err(err) = cpu.load(&program) {
    log::error!("{}: {err}", opts.file);
    return ExitCode::FAILURE;
  }

  // faults are already logged by the cpu
  match cpu.run(&mut io::stdout().lock()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  }
}

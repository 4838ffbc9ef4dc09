use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ls8::program::{self, LoadError};
use ls8::{Cpu, Error, Status};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_BAD_PROGRAM: u8 = 3;
const EXIT_FAULT: u8 = 4;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Program image to load
    #[arg(value_name = "PROGRAM_FILE")]
    program_file: PathBuf,

    /// Maximum number of instructions to execute
    #[arg(short, long)]
    max_instructions: Option<u64>,

    /// Trace each instruction to stderr
    #[arg(short, long)]
    trace: bool,

    /// Print the register file to stderr after the program halts
    #[arg(short, long)]
    dump_registers: bool,
}

pub fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are not errors.
            let code = if err.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let name = env::args().next().unwrap_or_else(|| "ls8-run".to_string());

    let image = match program::load_file(&args.program_file) {
        Ok(image) => image,
        Err(err @ LoadError::NotFound(_)) => {
            eprintln!("{name}: {err}");
            return ExitCode::from(EXIT_NOT_FOUND);
        }
        Err(err) => {
            eprintln!("{name}: {err}");
            return ExitCode::from(EXIT_BAD_PROGRAM);
        }
    };

    let mut cpu = Cpu::new();
    if let Err(err) = cpu.load_program(&image) {
        eprintln!("{name}: {}: {err}", args.program_file.display());
        return ExitCode::from(EXIT_BAD_PROGRAM);
    }

    match run(&args, &mut cpu) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{name}: {err:#}");
            ExitCode::from(EXIT_FAULT)
        }
    }
}

fn run(args: &Args, cpu: &mut Cpu) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        if args.trace {
            let (bytes, mnemonic) = cpu.decode_pc();
            eprintln!(
                "{}  {:8} {mnemonic}",
                cpu.trace_line(),
                bytes
                    .iter()
                    .map(|b| format!("{:02X}", b))
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }
        if let Some(max) = args.max_instructions {
            if cpu.instructions_executed() >= max {
                out.flush()?;
                return Err(Error::InstructionLimit(max))
                    .with_context(|| format!("stopped at PC={:#04X}", cpu.pc()));
            }
        }
        let pc = cpu.pc();
        match cpu.step(&mut out) {
            Ok(Status::Running) => {}
            Ok(Status::Halted) => break,
            Err(err) => {
                out.flush()?;
                return Err(err).with_context(|| format!("fault at PC={pc:#04X}"));
            }
        }
    }
    out.flush().context("flushing output")?;

    info!(
        instructions = cpu.instructions_executed(),
        pc = cpu.pc(),
        "CPU halted"
    );

    if args.dump_registers {
        let regs = cpu
            .registers()
            .iter()
            .enumerate()
            .map(|(i, r)| format!("R{i}={r:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        eprintln!("  PC={:02X} IR={:02X} {regs}", cpu.pc(), cpu.ir());
    }
    Ok(())
}

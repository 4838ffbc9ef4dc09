use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised by the emulator. Every variant ends the current run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory address {0:#04X} is out of bounds")]
    AddressOutOfBounds(u16),
    #[error("register R{0} does not exist")]
    RegisterOutOfBounds(u8),
    #[error("program of {len} bytes does not fit in {capacity} bytes of memory")]
    ProgramTooLarge { len: usize, capacity: usize },
    #[error("unknown opcode {opcode:#010b} at address {address:#04X}")]
    UnknownOpcode { opcode: u8, address: u16 },
    #[error("division by zero")]
    DivisionByZero,
    #[error("stack overflow at SP={sp:#04X}")]
    StackOverflow { sp: u8 },
    #[error("stack underflow at SP={sp:#04X}")]
    StackUnderflow { sp: u8 },
    #[error("no HLT after {0} instructions")]
    InstructionLimit(u64),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

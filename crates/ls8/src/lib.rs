//! An emulator for the LS-8, a small eight-bit CPU with 256 bytes of
//! memory, eight general-purpose registers and a downward-growing stack
//! addressed through `R7`.

pub mod alu;
mod cpu;
mod disasm;
mod error;
pub mod memory;
pub mod ops;
pub mod program;

pub use alu::AluOp;
pub use cpu::{Cpu, REGISTER_COUNT, SP_REGISTER, STACK_TOP, Status};
pub use error::{Error, Result};
pub use memory::{MEMORY_SIZE, Ram};

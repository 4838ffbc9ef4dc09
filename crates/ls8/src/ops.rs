//! The LS-8 opcode table.
//!
//! Each row of [`ops!`] declares an opcode byte, its operand kinds and the
//! handler that executes it. Decoding is a lookup into a 256-entry table
//! built at compile time; bytes without a row decode to `None`.

use std::io::Write;

use crate::{AluOp, Cpu, Error, Result};

/// What the dispatch loop does with PC once an instruction has executed.
pub(crate) enum Flow {
    /// Advance past the instruction and its operands.
    Next,
    /// Continue at the given address.
    Jump(u16),
    Halt,
}

pub(crate) type Handler = fn(&mut Cpu, [u8; 2], &mut dyn Write) -> Result<Flow>;

/// The kind of byte following an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A register index, 0 to 7.
    Reg,
    /// An immediate byte.
    Imm,
}

impl Operand {
    pub(crate) fn render(self, byte: u8) -> String {
        match self {
            Self::Reg => format!("R{byte}"),
            Self::Imm => format!("{byte}"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub operands: &'static [Operand],
    pub(crate) execute: Handler,
}

impl Instruction {
    /// Encoded length in bytes, including the opcode.
    pub const fn len(&self) -> u16 {
        1 + self.operands.len() as u16
    }
}

macro_rules! ops {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $byte:literal ( $($operand:ident),* ) => $handler:ident;
        )*
    ) => {
        /// Raw opcode bytes.
        pub mod opcode {
            $(
                $(#[$doc])*
                pub const $name: u8 = $byte;
            )*
        }

        const INSTRUCTIONS: &[Instruction] = &[
            $(
                Instruction {
                    opcode: $byte,
                    mnemonic: stringify!($name),
                    operands: &[$(Operand::$operand),*],
                    execute: $handler,
                },
            )*
        ];
    };
}

ops! {
    /// No operation.
    NOP  = 0b00000000 () => nop;
    /// Stop the machine.
    HLT  = 0b00000001 () => hlt;
    /// Pop a return address and jump to it.
    RET  = 0b00010001 () => ret;
    /// Push a register onto the stack.
    PUSH = 0b01000101 (Reg) => push;
    /// Pop the top of the stack into a register.
    POP  = 0b01000110 (Reg) => pop;
    /// Print a register as a decimal line.
    PRN  = 0b01000111 (Reg) => prn;
    /// Push the return address and jump to the address held in a register.
    CALL = 0b01010000 (Reg) => call;
    /// Load an immediate into a register.
    LDI  = 0b10000010 (Reg, Imm) => ldi;
    ADD  = 0b10100000 (Reg, Reg) => add;
    SUB  = 0b10100001 (Reg, Reg) => sub;
    MUL  = 0b10100010 (Reg, Reg) => mul;
    DIV  = 0b10100011 (Reg, Reg) => div;
}

static TABLE: [Option<Instruction>; 256] = build_table(INSTRUCTIONS);

const fn build_table(instructions: &[Instruction]) -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < instructions.len() {
        let instruction = instructions[i];
        if table[instruction.opcode as usize].is_some() {
            panic!("duplicate opcode in instruction table");
        }
        table[instruction.opcode as usize] = Some(instruction);
        i += 1;
    }
    table
}

/// Look up the instruction encoded by `opcode`.
pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    TABLE[opcode as usize].as_ref()
}

/// Every instruction the machine understands, in table order.
pub fn instructions() -> &'static [Instruction] {
    INSTRUCTIONS
}

fn nop(_cpu: &mut Cpu, _operands: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    Ok(Flow::Next)
}

fn hlt(_cpu: &mut Cpu, _operands: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    Ok(Flow::Halt)
}

fn ldi(cpu: &mut Cpu, [reg, value]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    cpu.set_reg(reg, value)?;
    Ok(Flow::Next)
}

fn prn(cpu: &mut Cpu, [reg, _]: [u8; 2], out: &mut dyn Write) -> Result<Flow> {
    writeln!(out, "{}", cpu.reg(reg)?)?;
    Ok(Flow::Next)
}

fn add(cpu: &mut Cpu, [a, b]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    cpu.alu(AluOp::Add, a, b)?;
    Ok(Flow::Next)
}

fn sub(cpu: &mut Cpu, [a, b]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    cpu.alu(AluOp::Sub, a, b)?;
    Ok(Flow::Next)
}

fn mul(cpu: &mut Cpu, [a, b]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    cpu.alu(AluOp::Mul, a, b)?;
    Ok(Flow::Next)
}

fn div(cpu: &mut Cpu, [a, b]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    cpu.alu(AluOp::Div, a, b)?;
    Ok(Flow::Next)
}

fn push(cpu: &mut Cpu, [reg, _]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    let value = cpu.reg(reg)?;
    cpu.push_stack(value)?;
    Ok(Flow::Next)
}

fn pop(cpu: &mut Cpu, [reg, _]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    // Validate the destination before the stack moves.
    cpu.reg(reg)?;
    let value = cpu.pop_stack()?;
    cpu.set_reg(reg, value)?;
    Ok(Flow::Next)
}

fn call(cpu: &mut Cpu, [reg, _]: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    let target = cpu.reg(reg)?;
    let return_addr = cpu.pc() + 2;
    let return_addr =
        u8::try_from(return_addr).map_err(|_| Error::AddressOutOfBounds(return_addr))?;
    cpu.push_stack(return_addr)?;
    Ok(Flow::Jump(target as u16))
}

fn ret(cpu: &mut Cpu, _operands: [u8; 2], _out: &mut dyn Write) -> Result<Flow> {
    let addr = cpu.pop_stack()?;
    Ok(Flow::Jump(addr as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_constants() {
        assert_eq!(decode(opcode::LDI).unwrap().mnemonic, "LDI");
        assert_eq!(decode(opcode::HLT).unwrap().len(), 1);
        assert_eq!(decode(opcode::PRN).unwrap().len(), 2);
        assert_eq!(decode(opcode::MUL).unwrap().len(), 3);
        assert_eq!(decode(0x82).unwrap().operands, &[Operand::Reg, Operand::Imm]);
    }

    #[test]
    fn unassigned_bytes_do_not_decode() {
        let known = instructions().len();
        let decoded = (0..=u8::MAX).filter(|b| decode(*b).is_some()).count();
        assert_eq!(known, decoded);
        assert!(decode(0xFF).is_none());
        assert!(decode(0b10100111).is_none());
    }

    #[test]
    fn operand_count_is_encoded_in_top_bits() {
        // LS-8 encodes the operand count in bits 6-7 of the opcode.
        for instruction in instructions() {
            assert_eq!(
                (instruction.opcode >> 6) as usize,
                instruction.operands.len(),
                "{}",
                instruction.mnemonic
            );
        }
    }
}

use std::io::Write;

use tracing::{debug, error, trace};

use crate::alu::{self, AluOp};
use crate::memory::Ram;
use crate::ops::{self, Flow, Instruction};
use crate::{Error, Result};

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Register holding the stack pointer.
pub const SP_REGISTER: u8 = 7;
/// Initial stack pointer. The stack grows down from here.
pub const STACK_TOP: u8 = 0xF4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// The LS-8 machine: memory, register file and program counter.
#[derive(Clone)]
pub struct Cpu {
    pc: u16,
    ir: u8,
    reg: [u8; REGISTER_COUNT],
    ram: Ram,
    status: Status,
    executed: u64,
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            pc: 0,
            ir: 0,
            reg: [0; REGISTER_COUNT],
            ram: Ram::new(),
            status: Status::Running,
            executed: 0,
        };
        cpu.reset();
        cpu
    }

    /// Return to the power-on state. Memory is left as it is, so a loaded
    /// program can be run again.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.ir = 0;
        self.reg = [0; REGISTER_COUNT];
        self.reg[SP_REGISTER as usize] = STACK_TOP;
        self.status = Status::Running;
        self.executed = 0;
    }

    /// Copy `image` into memory at address 0 and reset.
    pub fn load_program(&mut self, image: &[u8]) -> Result<()> {
        self.ram.load(image)?;
        self.reset();
        debug!(len = image.len(), "program loaded");
        Ok(())
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// The last opcode fetched.
    pub fn ir(&self) -> u8 {
        self.ir
    }

    pub fn sp(&self) -> u8 {
        self.reg[SP_REGISTER as usize]
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    /// Instructions executed since the last reset.
    pub fn instructions_executed(&self) -> u64 {
        self.executed
    }

    pub fn reg(&self, index: u8) -> Result<u8> {
        self.reg
            .get(index as usize)
            .copied()
            .ok_or(Error::RegisterOutOfBounds(index))
    }

    pub fn set_reg(&mut self, index: u8, value: u8) -> Result<()> {
        let slot = self
            .reg
            .get_mut(index as usize)
            .ok_or(Error::RegisterOutOfBounds(index))?;
        *slot = value;
        Ok(())
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.reg
    }

    pub fn read_memory(&self, addr: u16) -> Result<u8> {
        self.ram.read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) -> Result<()> {
        self.ram.write(addr, value)
    }

    pub fn memory(&self) -> &Ram {
        &self.ram
    }

    /// Apply `op` to registers `reg_a` and `reg_b`, storing the result in
    /// `reg_a`.
    pub fn alu(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<()> {
        let a = self.reg(reg_a)?;
        let b = self.reg(reg_b)?;
        let value = alu::compute(op, a, b)?;
        self.set_reg(reg_a, value)
    }

    pub(crate) fn push_stack(&mut self, value: u8) -> Result<()> {
        let sp = self.sp();
        let sp = sp.checked_sub(1).ok_or(Error::StackOverflow { sp })?;
        self.ram.write(sp as u16, value)?;
        self.reg[SP_REGISTER as usize] = sp;
        Ok(())
    }

    pub(crate) fn pop_stack(&mut self) -> Result<u8> {
        let sp = self.sp();
        let next = sp.checked_add(1).ok_or(Error::StackUnderflow { sp })?;
        let value = self.ram.read(sp as u16)?;
        self.reg[SP_REGISTER as usize] = next;
        Ok(value)
    }

    /// Execute a single instruction. Any error halts the machine; stepping a
    /// halted machine does nothing.
    pub fn step(&mut self, out: &mut impl Write) -> Result<Status> {
        if self.status == Status::Halted {
            return Ok(Status::Halted);
        }
        match self.execute(out) {
            Ok(status) => {
                self.status = status;
                Ok(status)
            }
            Err(err) => {
                error!(pc = self.pc, "{err}");
                self.status = Status::Halted;
                Err(err)
            }
        }
    }

    fn execute(&mut self, out: &mut dyn Write) -> Result<Status> {
        let pc = self.pc;
        self.ir = self.ram.read(pc)?;
        let Some(instruction) = ops::decode(self.ir) else {
            return Err(Error::UnknownOpcode {
                opcode: self.ir,
                address: pc,
            });
        };
        let operands = self.fetch_operands(instruction)?;
        trace!(
            pc,
            opcode = self.ir,
            mnemonic = instruction.mnemonic,
            ?operands,
            "execute"
        );

        let flow = (instruction.execute)(self, operands, out)?;
        self.executed += 1;
        match flow {
            Flow::Next => self.pc = pc + instruction.len(),
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => {
                debug!(pc, executed = self.executed, "halted");
                return Ok(Status::Halted);
            }
        }
        Ok(Status::Running)
    }

    fn fetch_operands(&self, instruction: &Instruction) -> Result<[u8; 2]> {
        let mut operands = [0; 2];
        for (offset, slot) in (1..).zip(operands.iter_mut().take(instruction.operands.len())) {
            *slot = self.ram.read(self.pc + offset)?;
        }
        Ok(operands)
    }

    /// Run until HLT, returning the number of instructions executed.
    pub fn run(&mut self, out: &mut impl Write) -> Result<u64> {
        let start = self.executed;
        while self.step(out)? == Status::Running {}
        Ok(self.executed - start)
    }

    /// Like [`Cpu::run`], but give up with [`Error::InstructionLimit`] after
    /// `max` instructions. The machine is left running and can be resumed.
    pub fn run_with_limit(&mut self, out: &mut impl Write, max: u64) -> Result<u64> {
        let start = self.executed;
        while self.status == Status::Running {
            if self.executed - start >= max {
                return Err(Error::InstructionLimit(max));
            }
            self.step(out)?;
        }
        Ok(self.executed - start)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt::Write as _;

use crate::Cpu;
use crate::ops;

impl Cpu {
    /// Decode the instruction at `addr` into its raw bytes and a mnemonic
    /// such as `LDI R0,8`. Unknown opcodes render as `???`.
    pub fn decode(&self, addr: u16) -> (Vec<u8>, String) {
        let Ok(op) = self.read_memory(addr) else {
            return (Vec::new(), "???".to_string());
        };
        let mut bytes = vec![op];
        let Some(instruction) = ops::decode(op) else {
            return (bytes, "???".to_string());
        };

        let mut args = Vec::with_capacity(instruction.operands.len());
        for (offset, operand) in (1..).zip(instruction.operands) {
            match self.read_memory(addr + offset) {
                Ok(b) => {
                    bytes.push(b);
                    args.push(operand.render(b));
                }
                Err(_) => args.push("?".to_string()),
            }
        }

        if args.is_empty() {
            (bytes, instruction.mnemonic.to_string())
        } else {
            (bytes, format!("{} {}", instruction.mnemonic, args.join(",")))
        }
    }

    pub fn decode_pc(&self) -> (Vec<u8>, String) {
        self.decode(self.pc())
    }

    /// One-line dump of PC, the next three memory bytes and the register
    /// file: `TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4`.
    pub fn trace_line(&self) -> String {
        let pc = self.pc();
        let mut line = format!("TRACE: {pc:02X} |");
        for addr in pc..pc + 3 {
            match self.read_memory(addr) {
                Ok(b) => {
                    let _ = write!(line, " {b:02X}");
                }
                Err(_) => line.push_str(" --"),
            }
        }
        line.push_str(" |");
        for r in self.registers() {
            let _ = write!(line, " {r:02X}");
        }
        line
    }
}

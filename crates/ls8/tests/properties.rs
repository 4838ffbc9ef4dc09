use ls8::ops::opcode::*;
use ls8::{AluOp, Cpu, MEMORY_SIZE, REGISTER_COUNT, STACK_TOP};
use proptest::prelude::*;

proptest! {
    #[test]
    fn register_round_trip(r in 0u8..REGISTER_COUNT as u8, v in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.set_reg(r, v).unwrap();
        prop_assert_eq!(cpu.reg(r).unwrap(), v);
    }

    #[test]
    fn memory_round_trip(addr in 0u16..MEMORY_SIZE as u16, v in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.write_memory(addr, v).unwrap();
        prop_assert_eq!(cpu.read_memory(addr).unwrap(), v);
    }

    #[test]
    fn ldi_then_prn_prints_the_immediate(r in 0u8..7, v in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.load_program(&[LDI, r, v, PRN, r, HLT]).unwrap();
        let mut out = Vec::<u8>::new();
        cpu.run(&mut out).unwrap();
        prop_assert_eq!(String::from_utf8(out).unwrap(), format!("{v}\n"));
    }

    #[test]
    fn push_pop_is_a_no_op(r in 0u8..7, v in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.load_program(&[LDI, r, v, PUSH, r, POP, r, HLT]).unwrap();
        cpu.run(&mut Vec::<u8>::new()).unwrap();
        prop_assert_eq!(cpu.reg(r).unwrap(), v);
        prop_assert_eq!(cpu.sp(), STACK_TOP);
    }

    #[test]
    fn alu_wraps_modulo_256(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = Cpu::new();
        cpu.set_reg(0, a).unwrap();
        cpu.set_reg(1, b).unwrap();
        cpu.alu(AluOp::Add, 0, 1).unwrap();
        prop_assert_eq!(cpu.reg(0).unwrap() as u32, (a as u32 + b as u32) % 256);
        cpu.set_reg(0, a).unwrap();
        cpu.alu(AluOp::Mul, 0, 1).unwrap();
        prop_assert_eq!(cpu.reg(0).unwrap() as u32, (a as u32 * b as u32) % 256);
    }

    #[test]
    fn call_returns_after_the_call(target in 16u8..200) {
        // 0: LDI R1,target  3: CALL R1  5: PRN R0  7: HLT
        let mut image = vec![LDI, 1, target, CALL, 1, PRN, 0, HLT];
        image.resize(target as usize, NOP);
        image.extend([LDI, 0, 77, RET]);
        let mut cpu = Cpu::new();
        cpu.load_program(&image).unwrap();
        let mut out = Vec::<u8>::new();
        cpu.run(&mut out).unwrap();
        prop_assert_eq!(String::from_utf8(out).unwrap(), "77\n");
        prop_assert_eq!(cpu.pc(), 7);
    }
}

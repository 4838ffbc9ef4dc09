//! Arithmetic on eight-bit register values.
//!
//! Results wrap modulo 256, matching the register width. Division is
//! unsigned floor division and is the only operation that can fail.

use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        };
        f.write_str(name)
    }
}

/// Compute `a op b`.
pub fn compute(op: AluOp, a: u8, b: u8) -> Result<u8> {
    match op {
        AluOp::Add => Ok(add(a, b)),
        AluOp::Sub => Ok(sub(a, b)),
        AluOp::Mul => Ok(mul(a, b)),
        AluOp::Div => div(a, b),
    }
}

#[inline(always)]
fn add(a: u8, b: u8) -> u8 {
    a.wrapping_add(b)
}

#[inline(always)]
fn sub(a: u8, b: u8) -> u8 {
    a.wrapping_sub(b)
}

#[inline(always)]
fn mul(a: u8, b: u8) -> u8 {
    a.wrapping_mul(b)
}

#[inline(always)]
fn div(a: u8, b: u8) -> Result<u8> {
    a.checked_div(b).ok_or(Error::DivisionByZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic() {
        assert_eq!(compute(AluOp::Add, 2, 3).unwrap(), 5);
        assert_eq!(compute(AluOp::Sub, 5, 3).unwrap(), 2);
        assert_eq!(compute(AluOp::Mul, 4, 6).unwrap(), 24);
        assert_eq!(compute(AluOp::Div, 12, 4).unwrap(), 3);
    }

    #[test]
    fn results_wrap_at_eight_bits() {
        assert_eq!(compute(AluOp::Add, 200, 100).unwrap(), 44);
        assert_eq!(compute(AluOp::Sub, 3, 5).unwrap(), 254);
        assert_eq!(compute(AluOp::Mul, 16, 17).unwrap(), 16);
    }

    #[test]
    fn division_floors() {
        assert_eq!(compute(AluOp::Div, 7, 2).unwrap(), 3);
        assert_eq!(compute(AluOp::Div, 1, 255).unwrap(), 0);
    }

    #[test]
    fn division_by_zero_for_every_dividend() {
        for a in 0..=u8::MAX {
            assert!(matches!(
                compute(AluOp::Div, a, 0),
                Err(Error::DivisionByZero)
            ));
        }
    }
}

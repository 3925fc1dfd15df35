use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use num_traits::{Signed, ToPrimitive, Zero};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

use crate::error::{Error, Result};
use crate::value::Value;

/// The most arguments any instruction takes.
pub const MAX_ARITY: usize = 3;

/**
  Opcodes of the virtual machine. The discriminant of each variant is the number that appears in
  the low two decimal digits of an instruction cell, so `Opcode::try_from` performs the opcode
  half of decoding.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq,        Debug,         Hash
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Opcode {
  Add                = 1,  // add( a, b, dst )
  Multiply           = 2,  // multiply( a, b, dst )
  Input              = 3,  // input( dst )
  Output             = 4,  // output( a )
  JumpIfTrue         = 5,  // jump_if_true( a, target )
  JumpIfFalse        = 6,  // jump_if_false( a, target )
  LessThan           = 7,  // less_than( a, b, dst )
  Equals             = 8,  // equals( a, b, dst )
  AdjustRelativeBase = 9,  // adjust_relative_base( a )
  Halt               = 99, // halt
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The number of argument cells following the opcode cell.
  pub fn arity(&self) -> usize {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::LessThan
      | Opcode::Equals             => 3,

      | Opcode::JumpIfTrue
      | Opcode::JumpIfFalse        => 2,

      | Opcode::Input
      | Opcode::Output
      | Opcode::AdjustRelativeBase => 1,

      Opcode::Halt                 => 0
    }
  }

  /// The number of cells the instruction occupies, including the opcode cell.
  pub fn width(&self) -> usize {
    self.arity() + 1
  }

  /// Whether the last argument is a write target rather than a value.
  pub fn writes(&self) -> bool {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::Input
      | Opcode::LessThan
      | Opcode::Equals => true,
      _                => false
    }
  }
}

/// How an argument cell is interpreted.
#[derive(
  StrumDisplay, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,             Eq,            PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum AddressingMode {
  /// The argument is a pointer into memory.
  Position  = 0,
  /// The argument is the literal value. Never valid as a write target.
  Immediate = 1,
  /// The argument is an offset from the relative base.
  Relative  = 2,
}

/// An opcode together with the raw mode digit of each of its arguments. Derived from a memory
/// cell each time it is executed; never stored.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Instruction {
  pub opcode : Opcode,
  modes      : [u8; MAX_ARITY]
}

impl Instruction {
  pub fn new(opcode: Opcode, modes: [u8; MAX_ARITY]) -> Instruction {
    Instruction { opcode, modes }
  }

  /**
    The raw mode digit of argument `n`, counting from zero. Digits absent from the cell are zero
    (`AddressingMode::Position`). The digit is not validated here, because only the resolver knows
    whether it is reading or writing through it.
  */
  pub fn mode(&self, n: usize) -> u8 {
    match n < MAX_ARITY {
      true  => self.modes[n],
      false => 0
    }
  }

  pub fn width(&self) -> usize {
    self.opcode.width()
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let modes =
      (0..self.opcode.arity())
        .map(|n| self.mode(n).to_string())
        .collect::<Vec<String>>()
        .join(", ");
    write!(f, "{}({})", self.opcode, modes)
  }
}

/**
  Splits an instruction cell into its opcode (the low two decimal digits) and one mode digit per
  argument (the remaining digits, read right to left). Fails with `IllegalOpcode` if the opcode is
  not in the instruction table; `ip` is recorded for the diagnostic.
*/
pub fn decode(cell: &Value, ip: usize) -> Result<Instruction> {
  let illegal = || Error::IllegalOpcode { opcode: cell.clone(), ip };

  if cell.is_negative() {
    return Err(illegal());
  }

  let hundred = Value::from(100u8);
  let ten     = Value::from(10u8);

  let opcode =
    (cell % &hundred)
      .to_u8()
      .and_then(|code| Opcode::try_from(code).ok())
      .ok_or_else(illegal)?;

  let mut modes: [u8; MAX_ARITY] = [0; MAX_ARITY];
  let mut rest = cell / &hundred;
  for mode in modes.iter_mut().take(opcode.arity()) {
    if rest.is_zero() {
      break;
    }
    // A remainder modulo ten always fits a `u8`.
    *mode = (&rest % &ten).to_u8().unwrap_or(0);
    rest  = rest / &ten;
  }

  Ok(Instruction { opcode, modes })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn decodes_opcode_and_modes_right_to_left() {
    let instruction = decode(&Value::from(1002), 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Multiply);
    assert_eq!(instruction.mode(0), 0);
    assert_eq!(instruction.mode(1), 1);
    assert_eq!(instruction.mode(2), 0);

    let instruction = decode(&Value::from(21108), 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Equals);
    assert_eq!((instruction.mode(0), instruction.mode(1), instruction.mode(2)), (1, 1, 2));
  }

  #[test]
  fn absent_mode_digits_default_to_position() {
    let instruction = decode(&Value::from(4), 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Output);
    assert_eq!(instruction.mode(0), u8::from(AddressingMode::Position));
    assert_eq!(instruction.mode(7), 0);
  }

  #[test]
  fn unrecognised_mode_digits_survive_decoding() {
    let instruction = decode(&Value::from(704), 3).unwrap();
    assert_eq!(instruction.mode(0), 7);
  }

  #[test]
  fn rejects_unknown_opcodes() {
    for cell in &[0, 10, 98, 100, -1, -99] {
      match decode(&Value::from(*cell), 42) {
        Err(Error::IllegalOpcode { opcode, ip }) => {
          assert_eq!(opcode, Value::from(*cell));
          assert_eq!(ip, 42);
        }
        other => panic!("cell {} decoded to {:?}", cell, other)
      }
    }
  }

  #[test]
  fn halt_has_no_arguments() {
    let instruction = decode(&Value::from(99), 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Halt);
    assert_eq!(instruction.width(), 1);
  }

  #[test]
  fn widths_and_write_targets() {
    assert_eq!(Opcode::Add.width(), 4);
    assert_eq!(Opcode::JumpIfFalse.width(), 3);
    assert_eq!(Opcode::AdjustRelativeBase.width(), 2);
    assert!(Opcode::Input.writes());
    assert!(!Opcode::Output.writes());
    assert!(!Opcode::JumpIfTrue.writes());
  }

  #[test]
  fn mnemonics_round_trip_through_strum() {
    assert_eq!(Opcode::AdjustRelativeBase.to_string(), "adjust_relative_base");
    assert_eq!(Opcode::from_str("less_than").unwrap(), Opcode::LessThan);
    assert_eq!(format!("{}", decode(&Value::from(1101), 0).unwrap()), "add(1, 1, 0)");
  }
}

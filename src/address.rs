//! An address into a machine's memory, with checked conversion from cell values.

use std::fmt::{Display, Formatter};
use std::ops::Add;

use num_traits::{Signed, ToPrimitive};

use crate::error::{Error, Result};
use crate::value::Value;

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Address(pub AddressNumberType);

impl Address {
  /// Converts the address to an index into the memory vector.
  pub fn idx(&self) -> AddressNumberType {
    self.0
  }

  /**
    Interprets a cell value as an address. The instruction pointer `ip` is only used to
    attribute a failure to the instruction that produced the address.
  */
  pub fn from_value(value: &Value, ip: usize) -> Result<Address> {
    if value.is_negative() {
      return Err(Error::NegativeAddress { address: value.clone(), ip });
    }
    // `usize::MAX` is excluded so that the cell count `idx + 1` always fits a word.
    match value.to_usize() {
      Some(idx) if idx < usize::MAX => Ok(Address(idx)),
      _                             => Err(Error::AddressOverflow { address: value.clone(), ip })
    }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "MEM[{}]", self.0)
  }
}

// Increment an address
impl Add<AddressNumberType> for Address {
  type Output = Address;
  fn add(self, rhs: AddressNumberType) -> Address {
    Address(self.0 + rhs)
  }
}

impl From<AddressNumberType> for Address {
  fn from(idx: AddressNumberType) -> Address {
    Address(idx)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn converts_non_negative_values() {
    let address = Address::from_value(&Value::from(17), 0).unwrap();
    assert_eq!(address, Address(17));
    assert_eq!(address + 3, Address(20));
    assert_eq!(format!("{}", address), "MEM[17]");
  }

  #[test]
  fn rejects_negative_values() {
    match Address::from_value(&Value::from(-1), 12) {
      Err(Error::NegativeAddress { address, ip }) => {
        assert_eq!(address, Value::from(-1));
        assert_eq!(ip, 12);
      }
      other => panic!("unexpected result: {:?}", other)
    }
  }

  #[test]
  fn rejects_values_wider_than_a_word() {
    let huge = Value::from(u64::MAX) * Value::from(u64::MAX);
    assert!(matches!(Address::from_value(&huge, 0), Err(Error::AddressOverflow { .. })));
  }

  #[test]
  fn rejects_the_largest_word() {
    let largest = Value::from(usize::MAX);
    assert!(matches!(Address::from_value(&largest, 5), Err(Error::AddressOverflow { ip: 5, .. })));
    let below = Value::from(usize::MAX - 1);
    assert_eq!(Address::from_value(&below, 0).unwrap(), Address(usize::MAX - 1));
  }
}

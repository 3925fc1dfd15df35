//! The contents of a memory cell. Cells hold arbitrary precision signed integers, so programs that
//! multiply large literals never overflow.

use num_bigint::BigInt;
use num_traits::{One, Zero};

pub type Value = BigInt;

/// The value an instruction writes for a true comparison.
pub fn truth(condition: bool) -> Value {
  match condition {
    true  => Value::one(),
    false => Value::zero()
  }
}

/// Parses a base-10 signed integer, tolerating surrounding whitespace.
pub fn parse_value(text: &str) -> Option<Value> {
  text.trim().parse::<Value>().ok()
}

/// Convenience for building literal listings and input queues.
pub fn values<I, T>(items: I) -> Vec<Value>
  where I: IntoIterator<Item = T>,
        T: Into<Value>
{
  items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truth_is_one_or_zero() {
    assert_eq!(truth(true), Value::from(1));
    assert_eq!(truth(false), Value::from(0));
  }

  #[test]
  fn parse_value_accepts_signs_and_whitespace() {
    assert_eq!(parse_value(" -42\n"), Some(Value::from(-42)));
    assert_eq!(parse_value("+7"), Some(Value::from(7)));
    assert_eq!(parse_value("seven"), None);
  }
}

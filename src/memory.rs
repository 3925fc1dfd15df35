//! The linear memory of a machine. Memory is conceptually infinite: reads past the end yield
//! zero, and writes past the end grow the store to fit. It never shrinks.

use std::fmt::{Display, Formatter};
use std::iter::FromIterator;

use num_traits::Zero;
use prettytable::{format as TableFormat, Table};

use crate::address::Address;
use crate::bytecode::parse_listing;
use crate::error::Result;
use crate::value::Value;

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Memory {
  cells: Vec<Value>
}

impl Memory {

  pub fn new() -> Memory {
    Memory { cells: vec![] }
  }

  /// Parses a delimited listing of base-10 integers into memory, starting at address 0.
  pub fn from_listing(text: &str) -> Result<Memory> {
    Ok(Memory { cells: parse_listing(text)? })
  }

  /// Returns the stored value, or zero if `address` is past the current extent.
  pub fn read(&self, address: Address) -> Value {
    match self.cells.get(address.idx()) {
      Some(value) => value.clone(),
      None        => Value::zero()
    }
  }

  /**
    Sets the value at the given address, dynamically growing the store if the address
    is larger than the max index of the vector. New cells are zero.
  */
  pub fn write(&mut self, address: Address, value: Value) {
    self.grow_to(address.idx() + 1);
    self.cells[address.idx()] = value;
  }

  /// Extends the store with zeros until it holds at least `len` cells.
  pub fn grow_to(&mut self, len: usize) {
    if len > self.cells.len() {
      self.cells.resize(len, Value::zero());
    }
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn cells(&self) -> &[Value] {
    &self.cells
  }

  pub fn into_cells(self) -> Vec<Value> {
    self.cells
  }

  /// Builds a two column address/contents table, marking `highlight` with an arrow.
  pub(crate) fn make_table(&self, highlight: Option<usize>) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in self.cells.iter().enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(row![r->format!("* --> {} =", Address(i)), format!("{}", cell)]);
        }

        false => {
          table.add_row(row![r->format!("{} =", Address(i)), format!("{}", cell)]);
        }

      }
    }
    table
  }
}

impl From<Vec<Value>> for Memory {
  fn from(cells: Vec<Value>) -> Memory {
    Memory { cells }
  }
}

impl FromIterator<Value> for Memory {
  fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Memory {
    Memory { cells: iter.into_iter().collect() }
  }
}

lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Memory {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.make_table(None))
  }
}

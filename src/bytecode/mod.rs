/*!
  Programs live in the same memory they manipulate, one integer per cell. An instruction is a cell
  whose low two decimal digits select the operation and whose remaining digits, read right to
  left, give the addressing mode of each argument:

    1002  ->  opcode 02 (multiply), modes [0, 1, 0]
     ││└┘
     │└─ mode of argument 1
     └── mode of argument 2

  Arguments occupy the cells immediately following the instruction cell. Decoding is done afresh
  every time an instruction executes, since a program is free to rewrite its own code.
*/

mod instruction;
mod listing;

pub use instruction::{decode, AddressingMode, Instruction, Opcode, MAX_ARITY};
pub use listing::parse_listing;

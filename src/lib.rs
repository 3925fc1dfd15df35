/*!
  A resumable stored-program machine. Programs are listings of integers loaded into a linear,
  growable memory of arbitrary precision cells. Instructions address their arguments by position,
  immediately, or relative to a movable base register. A machine that runs out of input suspends
  and hands back a `ResumeHandle`, which makes it possible to chain machines into pipelines that
  feed each other cooperatively on a single thread.

  ```
  use intcode::{ExecutionResult, Machine, values};

  let machine = Machine::from_listing("3,9,8,9,10,9,4,9,99,-1,8").unwrap();
  match machine.run(values(vec![8])).unwrap() {
    ExecutionResult::Halted { output, .. } => assert_eq!(output, values(vec![1])),
    ExecutionResult::Suspended { .. }      => unreachable!()
  }
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod error;
pub mod input;
pub mod machine;
pub mod memory;
pub mod pipeline;
pub mod value;

pub use address::Address;
pub use error::{Error, Result};
pub use input::{InputSource, PromptInput, StdinPrompt};
pub use machine::{ExecutionResult, Machine, ResumeHandle, State};
pub use memory::Memory;
pub use pipeline::{max_signal, permutations, BestSignal, Pipeline, PipelineOutcome, Topology};
pub use value::{values, Value};

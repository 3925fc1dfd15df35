//! The fetch-decode-execute engine, and the suspend/resume protocol built on top of it.

use std::collections::VecDeque;
use std::convert::TryFrom;
use std::fmt::{Debug, Display, Formatter};

use num_traits::Zero;
use prettytable::Table;
use strum_macros::Display as StrumDisplay;
use tracing::{debug, trace};

use crate::address::Address;
use crate::bytecode::{decode, AddressingMode, Instruction, Opcode};
use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::memory::{Memory, TABLE_DISPLAY_FORMAT};
use crate::value::{truth, Value};

/**
  A machine is either running, or suspended at an `Input` instruction waiting for a value. Halted
  machines no longer exist as machines: halting consumes the machine and yields its final memory.
*/
#[derive(StrumDisplay, Copy, Clone, Eq, PartialEq, Debug)]
pub enum State {
  Running,
  Suspended
}

/// What executing a single instruction did to the run.
enum Step {
  Continue,
  Starved,
  Halt
}

pub struct Machine {
  state         : State,
  memory        : Memory,

  // Registers //
  ip            : usize, // Instruction pointer, a cursor into `memory`
  relative_base : Value, // Origin for `AddressingMode::Relative`

  /// Consulted when the input queue is empty. Without one, the machine suspends instead.
  input_source  : Option<Box<dyn InputSource>>,
}

impl Machine {

  // region Construction and accessors

  pub fn new(memory: Memory) -> Machine {
    Machine {
      state         : State::Running,
      memory,
      ip            : 0,
      relative_base : Value::zero(),
      input_source  : None,
    }
  }

  pub fn from_listing(text: &str) -> Result<Machine> {
    Ok(Machine::new(Memory::from_listing(text)?))
  }

  /**
    Makes the machine block on `source` when its input queue is empty, instead of suspending.
    Intended for single, non-pipelined runs.
  */
  pub fn with_input_source(mut self, source: Box<dyn InputSource>) -> Machine {
    self.input_source = Some(source);
    self
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn instruction_pointer(&self) -> usize {
    self.ip
  }

  pub fn relative_base(&self) -> &Value {
    &self.relative_base
  }

  // endregion

  // region Execution

  /**
    Runs from the current instruction pointer until the program halts or, if no input source is
    configured, until an `Input` instruction finds `input` exhausted. The output of the returned
    result covers this call only.
  */
  pub fn run<I>(mut self, input: I) -> Result<ExecutionResult>
    where I: IntoIterator<Item = Value>
  {
    let mut input  : VecDeque<Value> = input.into_iter().collect();
    let mut output : Vec<Value>      = Vec::new();

    if self.state == State::Suspended {
      debug!(ip = self.ip, queued = input.len(), "resuming");
    }
    self.state = State::Running;

    loop {
      let instruction = decode(&self.memory.read(Address(self.ip)), self.ip)?;

      #[cfg(feature = "trace_computation")] println!("{}", self);
      trace!(ip = self.ip, relative_base = %self.relative_base, %instruction, "execute");

      match self.execute(instruction, &mut input, &mut output)? {

        Step::Continue => {}

        Step::Starved  => {
          debug!(ip = self.ip, emitted = output.len(), "suspended awaiting input");
          self.state = State::Suspended;
          return Ok(ExecutionResult::Suspended { handle: ResumeHandle { machine: self }, output });
        }

        Step::Halt     => {
          debug!(ip = self.ip, emitted = output.len(), "halted");
          return Ok(ExecutionResult::Halted { memory: self.memory, output });
        }

      }
    }
  }

  /**
    Runs to completion, calling `on_suspend` with the output of each partial run whenever the
    machine suspends, and feeding back whatever it returns. The output of every call is
    accumulated into the final result. If `on_suspend` returns no input the machine cannot make
    progress, so the suspended result is returned as is.
  */
  pub fn run_to_halt<I, F>(self, input: I, mut on_suspend: F) -> Result<ExecutionResult>
    where I: IntoIterator<Item = Value>,
          F: FnMut(&[Value]) -> Vec<Value>
  {
    let mut emitted: Vec<Value> = Vec::new();
    let mut result = self.run(input)?;

    loop {
      match result {

        ExecutionResult::Halted { memory, output } => {
          emitted.extend(output);
          return Ok(ExecutionResult::Halted { memory, output: emitted });
        }

        ExecutionResult::Suspended { handle, output } => {
          let next = on_suspend(&output);
          emitted.extend(output);
          if next.is_empty() {
            return Ok(ExecutionResult::Suspended { handle, output: emitted });
          }
          result = handle.resume(next)?;
        }

      }
    }
  }

  fn execute(
    &mut self,
    instruction : Instruction,
    input       : &mut VecDeque<Value>,
    output      : &mut Vec<Value>
  ) -> Result<Step> {
    match instruction.opcode {

      Opcode::Add => {
        let value = self.read_argument(&instruction, 0)? + self.read_argument(&instruction, 1)?;
        self.write_argument(&instruction, 2, value)?;
      }

      Opcode::Multiply => {
        let value = self.read_argument(&instruction, 0)? * self.read_argument(&instruction, 1)?;
        self.write_argument(&instruction, 2, value)?;
      }

      Opcode::Input => {
        let value = match input.pop_front() {
          Some(value) => value,
          None        => match self.input_source.as_mut() {
            Some(source) => source.next_value(self.ip)?,
            // Leave `ip` on this instruction so that resuming retries it.
            None         => return Ok(Step::Starved)
          }
        };
        self.write_argument(&instruction, 0, value)?;
      }

      Opcode::Output => {
        output.push(self.read_argument(&instruction, 0)?);
      }

      | Opcode::JumpIfTrue
      | Opcode::JumpIfFalse => {
        let condition = !self.read_argument(&instruction, 0)?.is_zero();
        if condition == (instruction.opcode == Opcode::JumpIfTrue) {
          let target = self.read_argument(&instruction, 1)?;
          self.ip    = Address::from_value(&target, self.ip)?.idx();
          return Ok(Step::Continue);
        }
      }

      Opcode::LessThan => {
        let value = truth(self.read_argument(&instruction, 0)? < self.read_argument(&instruction, 1)?);
        self.write_argument(&instruction, 2, value)?;
      }

      Opcode::Equals => {
        let value = truth(self.read_argument(&instruction, 0)? == self.read_argument(&instruction, 1)?);
        self.write_argument(&instruction, 2, value)?;
      }

      Opcode::AdjustRelativeBase => {
        let offset = self.read_argument(&instruction, 0)?;
        self.relative_base += offset;
      }

      Opcode::Halt => {
        return Ok(Step::Halt);
      }

    }

    self.ip += instruction.width();
    Ok(Step::Continue)
  }

  // endregion

  // region Addressing

  /// The raw contents of the cell holding argument `n` of the current instruction.
  fn argument_cell(&self, n: usize) -> Value {
    self.memory.read(Address(self.ip + 1 + n))
  }

  /// Resolves argument `n` to the value it denotes.
  fn read_argument(&self, instruction: &Instruction, n: usize) -> Result<Value> {
    let cell = self.argument_cell(n);
    let mode = instruction.mode(n);

    match AddressingMode::try_from(mode) {

      Ok(AddressingMode::Position)  => {
        Ok(self.memory.read(Address::from_value(&cell, self.ip)?))
      }

      Ok(AddressingMode::Immediate) => Ok(cell),

      Ok(AddressingMode::Relative)  => {
        let address = Address::from_value(&(&self.relative_base + cell), self.ip)?;
        Ok(self.memory.read(address))
      }

      Err(_) => Err(Error::IllegalReadMode { mode, ip: self.ip })

    }
  }

  /// Resolves argument `n` to the address it denotes as a write target.
  fn write_address(&self, instruction: &Instruction, n: usize) -> Result<Address> {
    let cell = self.argument_cell(n);
    let mode = instruction.mode(n);

    match AddressingMode::try_from(mode) {
      Ok(AddressingMode::Position) => Address::from_value(&cell, self.ip),
      Ok(AddressingMode::Relative) => Address::from_value(&(&self.relative_base + cell), self.ip),
      _                            => Err(Error::IllegalWriteMode { mode, ip: self.ip })
    }
  }

  fn write_argument(&mut self, instruction: &Instruction, n: usize, value: Value) -> Result<()> {
    let address = self.write_address(instruction, n)?;
    self.memory.write(address, value);
    Ok(())
  }

  // endregion

}

/**
  The outcome of a single run call. Output is never carried across calls: a caller that resumes a
  machine several times accumulates the output of each call itself.
*/
#[derive(Debug)]
pub enum ExecutionResult {
  Halted {
    memory : Memory,
    output : Vec<Value>
  },
  Suspended {
    handle : ResumeHandle,
    output : Vec<Value>
  }
}

impl ExecutionResult {
  pub fn is_halted(&self) -> bool {
    match self {
      ExecutionResult::Halted { .. } => true,
      _                              => false
    }
  }

  pub fn output(&self) -> &[Value] {
    match self {
      | ExecutionResult::Halted    { output, .. }
      | ExecutionResult::Suspended { output, .. } => output
    }
  }

  pub fn into_output(self) -> Vec<Value> {
    match self {
      | ExecutionResult::Halted    { output, .. }
      | ExecutionResult::Suspended { output, .. } => output
    }
  }

  /// The final memory if halted, or the snapshot held by the resume handle.
  pub fn memory(&self) -> &Memory {
    match self {
      ExecutionResult::Halted    { memory, .. } => memory,
      ExecutionResult::Suspended { handle, .. } => handle.memory()
    }
  }
}

/**
  Everything needed to continue a suspended run: the memory snapshot, the instruction pointer
  (still addressing the starved `Input` instruction), and the relative base. It must be handed
  back unchanged; resuming with another machine's state is undefined.
*/
#[derive(Debug)]
pub struct ResumeHandle {
  machine: Machine
}

impl ResumeHandle {
  /// Rebuilds a handle from parts previously obtained with `into_parts`.
  pub fn from_parts(memory: Memory, ip: usize, relative_base: Value) -> ResumeHandle {
    let mut machine = Machine::new(memory);
    machine.state         = State::Suspended;
    machine.ip            = ip;
    machine.relative_base = relative_base;
    ResumeHandle { machine }
  }

  pub fn into_parts(self) -> (Memory, usize, Value) {
    (self.machine.memory, self.machine.ip, self.machine.relative_base)
  }

  /// Continues the run by retrying the `Input` instruction it stopped at, with a fresh queue.
  pub fn resume<I>(self, input: I) -> Result<ExecutionResult>
    where I: IntoIterator<Item = Value>
  {
    self.machine.run(input)
  }

  pub fn memory(&self) -> &Memory {
    &self.machine.memory
  }

  pub fn instruction_pointer(&self) -> usize {
    self.machine.ip
  }

  pub fn relative_base(&self) -> &Value {
    &self.machine.relative_base
  }
}

// region Display methods

impl Debug for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Machine")
     .field("state", &self.state)
     .field("ip", &self.ip)
     .field("relative_base", &self.relative_base)
     .field("memory_len", &self.memory.len())
     .field("interactive", &self.input_source.is_some())
     .finish()
  }
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let m_table = self.memory.make_table(Some(self.ip));

    let mut r_table = Table::new();
    r_table.set_format(*TABLE_DISPLAY_FORMAT);
    r_table.set_titles(row![ubr->"Register", ubl->"Contents"]);
    r_table.add_row(row![r->"IP =", format!("{}", self.ip)]);
    r_table.add_row(row![r->"RB =", format!("{}", self.relative_base)]);

    let mut combined_table = table!([m_table, r_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Registers"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "State: {}\n{}", self.state, combined_table)
  }
}

// endregion

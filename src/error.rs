//! Errors raised while loading or executing a program. All of them are fatal to the run that
//! produced them. Running out of input is not an error; see `ExecutionResult::Suspended`.

use thiserror::Error;

use crate::value::Value;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// The decoded opcode is not in the instruction table. Also raised when execution runs off the
  /// end of a program, since the cells past the end read as zero.
  #[error("illegal opcode {opcode} at instruction pointer {ip}")]
  IllegalOpcode { opcode: Value, ip: usize },

  #[error("illegal read mode {mode} at instruction pointer {ip}")]
  IllegalReadMode { mode: u8, ip: usize },

  /// Immediate mode used as a write target, or an unrecognised mode digit.
  #[error("illegal write mode {mode} at instruction pointer {ip}")]
  IllegalWriteMode { mode: u8, ip: usize },

  #[error("negative address {address} at instruction pointer {ip}")]
  NegativeAddress { address: Value, ip: usize },

  /// The address is non-negative but does not fit a machine word.
  #[error("address {address} out of range at instruction pointer {ip}")]
  AddressOverflow { address: Value, ip: usize },

  #[error("malformed program listing at byte {offset}: {message}")]
  Parse { offset: usize, message: String },

  #[error("expected an integer on input, got {line:?}")]
  InvalidInput { line: String },

  #[error("input closed while the instruction at {ip} was waiting for a value")]
  InputClosed { ip: usize },

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  /// A full round of the pipeline passed without any machine consuming input, producing output,
  /// or halting.
  #[error("pipeline stalled in round {round}")]
  PipelineStalled { round: usize },

  #[error("pipeline stage {stage} failed: {source}")]
  StageFailed {
    stage  : usize,
    #[source]
    source : Box<Error>
  },
}

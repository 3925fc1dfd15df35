//! Interactive input for machines that block, rather than suspend, when their input queue runs dry.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::{Error, Result};
use crate::value::{parse_value, Value};

/// A blocking source of input values, consulted one value at a time.
pub trait InputSource {
  /// Produces the value for the `Input` instruction at `ip`.
  fn next_value(&mut self, ip: usize) -> Result<Value>;
}

/**
  A line based prompt. Each request writes a prompt naming the waiting instruction to `writer`
  and reads one line from `reader`. Blank lines are skipped; anything else that is not an integer
  is an error.
*/
pub struct PromptInput<R, W> {
  reader : R,
  writer : W
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
  pub fn new(reader: R, writer: W) -> PromptInput<R, W> {
    PromptInput { reader, writer }
  }

  pub fn into_inner(self) -> (R, W) {
    (self.reader, self.writer)
  }
}

pub type StdinPrompt = PromptInput<BufReader<Stdin>, Stdout>;

impl StdinPrompt {
  pub fn stdin() -> StdinPrompt {
    PromptInput::new(BufReader::new(io::stdin()), io::stdout())
  }
}

impl<R: BufRead, W: Write> InputSource for PromptInput<R, W> {
  fn next_value(&mut self, ip: usize) -> Result<Value> {
    loop {
      write!(self.writer, "At instruction {} we need an input: ", ip)?;
      self.writer.flush()?;

      let mut line = String::new();
      if self.reader.read_line(&mut line)? == 0 {
        return Err(Error::InputClosed { ip });
      }
      if line.trim().is_empty() {
        continue;
      }

      return match parse_value(&line) {
        Some(value) => Ok(value),
        None        => Err(Error::InvalidInput { line: line.trim().to_string() })
      };
    }
  }
}

impl<F> InputSource for F
  where F: FnMut(usize) -> Result<Value>
{
  fn next_value(&mut self, ip: usize) -> Result<Value> {
    self(ip)
  }
}

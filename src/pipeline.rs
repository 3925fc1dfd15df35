/*!
  Chains of machines whose outputs feed one another's inputs. Each machine owns its own copy of
  memory. Machines are driven round-robin in declaration order, each one resumed with whatever
  input has accumulated for it since its last turn, until every machine has halted.
*/

use std::collections::VecDeque;
use std::mem;

use strum_macros::{Display as StrumDisplay, EnumString};
use tracing::debug;

use crate::error::{Error, Result};
use crate::machine::{ExecutionResult, Machine, ResumeHandle};
use crate::memory::Memory;
use crate::value::Value;

/// Where the output of the last machine goes.
#[derive(StrumDisplay, EnumString, Copy, Clone, Eq, PartialEq, Debug)]
#[strum(serialize_all = "snake_case")]
pub enum Topology {
  /// The last machine's output leaves the pipeline.
  Linear,
  /// The last machine's output wraps around to the first machine's input.
  Feedback
}

enum Stage {
  Ready(Machine),
  Suspended(ResumeHandle),
  Halted
}

impl Stage {
  fn is_halted(&self) -> bool {
    match self {
      Stage::Halted => true,
      _             => false
    }
  }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PipelineOutcome {
  /// Everything the last machine emitted, across all rounds.
  pub final_output : Vec<Value>,
  /// The last value the last machine emitted. In a feedback pipeline this is the value
  /// forwarded to the first machine on its final round.
  pub last_signal  : Option<Value>,
  pub rounds       : usize
}

pub struct Pipeline {
  stages   : Vec<Stage>,
  queues   : Vec<VecDeque<Value>>,
  topology : Topology
}

impl Pipeline {

  /// One machine per phase, each running its own copy of `program` with its phase queued as its
  /// first input.
  pub fn new(program: &Memory, phases: &[Value], topology: Topology) -> Pipeline {
    let machines = phases.iter().map(|_| Machine::new(program.clone())).collect();
    let mut pipeline = Pipeline::from_machines(machines, topology);
    for (queue, phase) in pipeline.queues.iter_mut().zip(phases) {
      queue.push_back(phase.clone());
    }
    pipeline
  }

  pub fn from_machines(machines: Vec<Machine>, topology: Topology) -> Pipeline {
    let queues = machines.iter().map(|_| VecDeque::new()).collect();
    Pipeline {
      stages: machines.into_iter().map(Stage::Ready).collect(),
      queues,
      topology
    }
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /**
    Appends `initial` to the first machine's queue and drives the pipeline until every machine
    halts. Input forwarded to a machine that has already halted is discarded. A failure in any
    machine aborts the whole pipeline and is attributed to that machine's position.
  */
  pub fn run<I>(mut self, initial: I) -> Result<PipelineOutcome>
    where I: IntoIterator<Item = Value>
  {
    let count = self.stages.len();
    let mut final_output: Vec<Value> = Vec::new();
    let mut rounds = 0;

    if let Some(queue) = self.queues.first_mut() {
      queue.extend(initial);
    }

    while !self.stages.iter().all(Stage::is_halted) {
      rounds += 1;
      let mut progressed = false;

      for i in 0..count {
        let input: Vec<Value> = self.queues[i].drain(..).collect();
        let consumed = !input.is_empty();

        let result = match mem::replace(&mut self.stages[i], Stage::Halted) {
          Stage::Ready(machine)    => {
            progressed = true;
            machine.run(input)
          }
          Stage::Suspended(handle) => {
            progressed |= consumed;
            handle.resume(input)
          }
          Stage::Halted            => continue
        }.map_err(|source| Error::StageFailed { stage: i, source: Box::new(source) })?;

        let output = match result {
          ExecutionResult::Halted { output, .. } => {
            debug!(stage = i, round = rounds, "pipeline stage halted");
            progressed = true;
            output
          }
          ExecutionResult::Suspended { handle, output } => {
            self.stages[i] = Stage::Suspended(handle);
            output
          }
        };
        progressed |= !output.is_empty();

        if i + 1 == count {
          final_output.extend(output.iter().cloned());
        }
        match (i + 1 < count, self.topology) {
          (true,  _                 ) => self.queues[i + 1].extend(output),
          (false, Topology::Feedback) => self.queues[0].extend(output),
          (false, Topology::Linear  ) => {}
        }
      }

      if !progressed {
        return Err(Error::PipelineStalled { round: rounds });
      }
    }

    debug!(rounds, stages = count, "pipeline complete");
    Ok(PipelineOutcome {
      last_signal: final_output.last().cloned(),
      final_output,
      rounds
    })
  }
}

/// The strongest signal a pipeline produced, and the phase ordering that produced it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BestSignal {
  pub signal : Value,
  pub phases : Vec<Value>
}

/**
  Runs a pipeline for every ordering of `phase_set` and returns the ordering with the largest
  `last_signal`. Returns `None` if no ordering produced any signal.
*/
pub fn max_signal(
  program   : &Memory,
  phase_set : &[Value],
  topology  : Topology,
  initial   : &[Value]
) -> Result<Option<BestSignal>> {
  let mut best: Option<BestSignal> = None;

  for phases in permutations(phase_set) {
    let outcome = Pipeline::new(program, &phases, topology).run(initial.to_vec())?;
    if let Some(signal) = outcome.last_signal {
      let better = match &best {
        Some(current) => signal > current.signal,
        None          => true
      };
      if better {
        best = Some(BestSignal { signal, phases });
      }
    }
  }

  Ok(best)
}

/// Every ordering of `items`, generated with Heap's algorithm.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
  let mut current = items.to_vec();
  let mut result  = vec![current.clone()];
  let mut counter = vec![0usize; current.len()];
  let mut i = 1;

  while i < current.len() {
    if counter[i] < i {
      match i % 2 == 0 {
        true  => current.swap(0, i),
        false => current.swap(counter[i], i)
      }
      result.push(current.clone());
      counter[i] += 1;
      i = 1;
    } else {
      counter[i] = 0;
      i += 1;
    }
  }

  result
}

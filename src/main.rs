use std::fs;
use std::io::{self, Read};
use std::process;

use argh::FromArgs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use intcode::{
  bytecode::parse_listing,
  max_signal,
  ExecutionResult,
  Machine,
  Memory,
  Result,
  StdinPrompt,
  Topology,
  Value
};

/// Runs programs on a resumable stored-program machine.
#[derive(FromArgs)]
struct Arguments {
  #[argh(subcommand)]
  command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
  Run(RunArguments),
  Amplify(AmplifyArguments),
}

/// run a program once
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
struct RunArguments {
  /// the program listing to load, `-` for stdin
  #[argh(positional)]
  program: String,

  /// comma separated values queued as input
  #[argh(option, short = 'i', default = "String::new()")]
  input: String,

  /// prompt on stdin when the input queue runs dry, instead of suspending
  #[argh(switch)]
  interactive: bool,

  /// print the final memory as a table
  #[argh(switch)]
  dump: bool,
}

/// find the phase ordering that maximises the signal of a pipeline of machines
#[derive(FromArgs)]
#[argh(subcommand, name = "amplify")]
struct AmplifyArguments {
  /// the program listing every stage runs, `-` for stdin
  #[argh(positional)]
  program: String,

  /// comma separated phase settings, one stage per phase
  #[argh(option, short = 'p', default = "String::from(\"0,1,2,3,4\")")]
  phases: String,

  /// wrap the last stage's output back into the first stage
  #[argh(switch)]
  feedback: bool,

  /// comma separated values fed to the first stage
  #[argh(option, default = "String::from(\"0\")")]
  initial: String,
}

fn read_program(path: &str) -> Result<Memory> {
  let text = match path {
    "-" => {
      let mut text = String::new();
      io::stdin().read_to_string(&mut text)?;
      text
    }
    _   => fs::read_to_string(path)?
  };
  Memory::from_listing(&text)
}

fn print_values(values: &[Value]) {
  for value in values {
    println!("{}", value);
  }
}

fn run(arguments: RunArguments) -> Result<i32> {
  let memory  = read_program(&arguments.program)?;
  let input   = parse_listing(&arguments.input)?;
  let mut machine = Machine::new(memory);
  if arguments.interactive {
    machine = machine.with_input_source(Box::new(StdinPrompt::stdin()));
  }

  match machine.run(input)? {

    ExecutionResult::Halted { memory, output } => {
      print_values(&output);
      if arguments.dump {
        println!("{}", memory);
      }
      Ok(0)
    }

    ExecutionResult::Suspended { handle, output } => {
      print_values(&output);
      eprintln!(
        "suspended at instruction {} awaiting input (relative base {})",
        handle.instruction_pointer(),
        handle.relative_base()
      );
      if arguments.dump {
        println!("{}", handle.memory());
      }
      Ok(2)
    }

  }
}

fn amplify(arguments: AmplifyArguments) -> Result<i32> {
  let memory   = read_program(&arguments.program)?;
  let phases   = parse_listing(&arguments.phases)?;
  let initial  = parse_listing(&arguments.initial)?;
  let topology = match arguments.feedback {
    true  => Topology::Feedback,
    false => Topology::Linear
  };
  info!(stages = phases.len(), %topology, "searching phase orderings");

  match max_signal(&memory, &phases, topology, &initial)? {
    Some(best) => {
      let phases = best.phases.iter().map(Value::to_string).collect::<Vec<String>>().join(",");
      println!("{} (phases {})", best.signal, phases);
      Ok(0)
    }
    None       => {
      eprintln!("no ordering produced a signal");
      Ok(1)
    }
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("intcode=warn"))
    )
    .with_writer(io::stderr)
    .init();

  let arguments: Arguments = argh::from_env();
  let result = match arguments.command {
    Command::Run(arguments)     => run(arguments),
    Command::Amplify(arguments) => amplify(arguments),
  };

  match result {
    Ok(code) => process::exit(code),
    Err(e)   => {
      eprintln!("error: {}", e);
      process::exit(1);
    }
  }
}

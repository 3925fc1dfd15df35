use std::io::Cursor;

use intcode::{values, Address, Error, ExecutionResult, Machine, Memory, PromptInput, Value};

fn run_to_halt(listing: &str, input: Vec<Value>) -> (Memory, Vec<Value>) {
  match Machine::from_listing(listing).unwrap().run(input).unwrap() {
    ExecutionResult::Halted { memory, output } => (memory, output),
    other => panic!("expected the program to halt: {:?}", other)
  }
}

/// Runs `listing`, handing the input over in the given chunks, one chunk per run call.
fn run_in_chunks(listing: &str, mut chunks: Vec<Vec<Value>>) -> (Memory, Vec<Value>) {
  chunks.reverse();
  let mut emitted = Vec::new();
  let mut result  = Machine::from_listing(listing).unwrap().run(chunks.pop().unwrap_or_default()).unwrap();

  loop {
    match result {
      ExecutionResult::Halted { memory, output } => {
        emitted.extend(output);
        return (memory, emitted);
      }
      ExecutionResult::Suspended { handle, output } => {
        emitted.extend(output);
        let chunk = chunks.pop().expect("ran out of input chunks while suspended");
        result = handle.resume(chunk).unwrap();
      }
    }
  }
}

const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

// Reads three values, emitting twice the first, then the running sum after each later value.
const INTERLEAVED: &str = "3,100,1002,100,2,104,4,104,3,101,1,100,101,103,4,103,3,102,1,103,102,103,4,103,99";

#[test]
fn self_reproducing_program_outputs_its_own_listing() {
  let (_, output) = run_to_halt(QUINE, vec![]);
  assert_eq!(output, Memory::from_listing(QUINE).unwrap().into_cells());
}

#[test]
fn large_literal_passes_through() {
  let (_, output) = run_to_halt("104,1125899906842624,99", vec![]);
  assert_eq!(output, vec!["1125899906842624".parse::<Value>().unwrap()]);
}

#[test]
fn multiplication_produces_a_sixteen_digit_number() {
  let (_, output) = run_to_halt("1102,34915192,34915192,7,4,7,99,0", vec![]);
  assert_eq!(output.len(), 1);
  assert_eq!(output[0].to_string().len(), 16);
  assert_eq!(output[0], Value::from(34915192i64 * 34915192i64));
}

#[test]
fn products_beyond_sixty_four_bits_stay_exact() {
  let (_, output) = run_to_halt("1102,9223372036854775807,9223372036854775807,7,4,7,99,0", vec![]);
  let expected = Value::from(i64::MAX) * Value::from(i64::MAX);
  assert_eq!(output, vec![expected]);
}

#[test]
fn equality_in_immediate_mode() {
  let program = "3,3,1108,-1,8,3,4,3,99";
  assert_eq!(run_to_halt(program, values(vec![8])).1, values(vec![1]));
  assert_eq!(run_to_halt(program, values(vec![7])).1, values(vec![0]));
}

#[test]
fn suspending_and_resuming_matches_a_single_run() {
  let input = values(vec![5, 7, -3]);
  let (expected_memory, expected_output) = run_to_halt(INTERLEAVED, input.clone());
  assert_eq!(expected_output, values(vec![10, 12, 9]));

  let splits: Vec<Vec<Vec<i64>>> = vec![
    vec![vec![5, 7, -3]],
    vec![vec![], vec![5], vec![7, -3]],
    vec![vec![5], vec![7], vec![-3]],
    vec![vec![5, 7], vec![], vec![-3]],
    vec![vec![], vec![], vec![5, 7, -3]],
  ];
  for split in splits {
    let chunks = split.into_iter().map(values).collect();
    let (memory, output) = run_in_chunks(INTERLEAVED, chunks);
    assert_eq!(output, expected_output);
    assert_eq!(memory, expected_memory);
  }
}

#[test]
fn relative_writes_read_back_through_position_mode() {
  for &(base, offset) in &[(0i64, 20i64), (50, 7), (1000, -3)] {
    let target  = base + offset;
    let listing = format!("109,{},21101,19,23,{},4,{},99", base, offset, target);
    let (memory, output) = run_to_halt(&listing, vec![]);
    assert_eq!(output, values(vec![42]));
    assert_eq!(memory.read(Address(target as usize)), Value::from(42));
  }
}

#[test]
fn distant_writes_leave_lower_memory_intact() {
  let (memory, output) = run_to_halt("1101,5,6,100000,4,50000,99", vec![]);
  assert_eq!(output, values(vec![0]));
  assert_eq!(memory.len(), 100_001);
  assert_eq!(&memory.cells()[..7], &values(vec![1101, 5, 6, 100000, 4, 50000, 99])[..]);
  assert_eq!(memory.read(Address(99_999)), Value::from(0));
  assert_eq!(memory.read(Address(100_000)), Value::from(11));
  assert_eq!(memory.read(Address(200_000)), Value::from(0));
}

#[test]
fn interactive_input_is_read_when_the_queue_is_empty() {
  let prompt  = PromptInput::new(Cursor::new("8\n"), Vec::new());
  let machine = Machine::from_listing("3,9,8,9,10,9,4,9,99,-1,8").unwrap().with_input_source(Box::new(prompt));
  let result  = machine.run(vec![]).unwrap();
  assert!(result.is_halted());
  assert_eq!(result.output(), &values(vec![1])[..]);
}

#[test]
fn queued_input_takes_priority_over_the_prompt() {
  let prompt  = PromptInput::new(Cursor::new(""), Vec::new());
  let machine = Machine::from_listing("3,0,4,0,99").unwrap().with_input_source(Box::new(prompt));
  assert_eq!(machine.run(values(vec![3])).unwrap().into_output(), values(vec![3]));
}

#[test]
fn closed_prompt_fails_the_run() {
  let prompt  = PromptInput::new(Cursor::new(""), Vec::new());
  let machine = Machine::from_listing("104,1,3,0,99").unwrap().with_input_source(Box::new(prompt));
  assert!(matches!(machine.run(vec![]), Err(Error::InputClosed { ip: 2 })));
}

#[test]
fn malformed_listing_is_rejected() {
  assert!(matches!(Machine::from_listing("1,2,,3"), Err(Error::Parse { .. })));
}

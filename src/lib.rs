//! Terminal CHIP-8 interpreter.
//!
//! ## Design
//!
//! * the interpreter core knows nothing about screens, keyboards or clocks;
//!   it exposes its state and the host pokes at it between cycles
//! * one .cycle() is one CHIP-8 instruction; nothing in it blocks
//! * errors come back as values and leave the machine untouched, so a host
//!   can show them, reset, or carry on
//! * timers are ticked by the host at 60Hz, separately from the instruction
//!   rate
//!
//! Model
//!
//! Environment
//!  |-- display, input, config
//!  |-- interpreter
//!  |    |-- machine: memory, registers, stack, timers, keypad, framebuffer
//!  |    `-- instruction decoder
//!  `-- main loop (see environment.rs)

pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod timer;

pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, CycleState};
pub use machine::Machine;
pub use timer::TimerEvent;

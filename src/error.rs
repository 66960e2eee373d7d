use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. None of these are fatal to the
/// process; the host decides whether to halt, reset or report.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is {size} bytes, but only {max} bytes fit above 0x200")]
    Load { size: usize, max: usize },

    #[error("couldn't read program: {0}")]
    Io(#[from] io::Error),

    #[error("memory access out of bounds at {addr:#06x}")]
    OutOfBounds { addr: usize },

    #[error("stack overflow calling from {pc:#06x}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning at {pc:#06x}")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06x} in class {class:#x}")]
    UnknownOpcode { class: u8, opcode: u16 },

    #[error("no such key {key:#04x}")]
    InvalidKey { key: u8 },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;

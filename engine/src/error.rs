use std::io;

use crate::opcode::Opcode;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults that end the current execution session.
///
/// None of these are recoverable at the instruction level; the host is expected
/// to report the fault and stop stepping the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to load ROM: {0}")]
    Load(#[from] LoadError),

    #[error("unknown opcode {0}")]
    UnknownOpcode(Opcode),

    #[error("stack fault: {0}")]
    Stack(#[from] StackFault),

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("ROM is empty")]
    Empty,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    TooLarge { size: usize, max_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackFault {
    #[error("call stack overflow (more than {depth} nested calls)")]
    Overflow { depth: usize },

    #[error("return with an empty call stack")]
    Underflow,
}

pub use chip8::Chip8;
pub use error::{Error, LoadError, Result, StackFault};
pub use frame_buffer::FrameBuffer;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operations::Keypad;
pub use state::{Mode, State};

mod chip8;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
pub mod memory;
mod opcode;
mod operations;
pub mod sprites;
pub mod state;

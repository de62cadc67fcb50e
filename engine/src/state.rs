use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::error::{Result, StackFault};
use crate::frame_buffer::FrameBuffer;
use crate::memory::Memory;
use crate::opcode::Opcode;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - both are decremented once per executed cycle
///
/// ## Memory
/// - 16 slot return address stack
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///
/// ## Input
/// - Emulation halts in `Mode::AwaitingKey` until a key is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub timers: Timers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub mode: Mode,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: Stack::new(),
            timers: Timers::default(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            mode: Mode::Running,
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<Opcode> {
        let bytes = self.memory.slice(self.pc, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the CPU is executing instructions or parked on an `Fx0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    /// Waiting for any key to be held; the key's index goes into V`register`
    AwaitingKey { register: u8 },
}

/// # Call stack
/// Return addresses for up to `STACK_SIZE` nested subroutine calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stack {
    slots: [u16; STACK_SIZE],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            slots: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> std::result::Result<(), StackFault> {
        let slot = self
            .slots
            .get_mut(self.sp)
            .ok_or(StackFault::Overflow { depth: STACK_SIZE })?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> std::result::Result<u16, StackFault> {
        if self.sp == 0 {
            return Err(StackFault::Underflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp])
    }

    /// The stack pointer; also the number of return addresses held
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// The return address most recently pushed, if any
    pub fn peek(&self) -> Option<u16> {
        self.sp.checked_sub(1).map(|top| self.slots[top])
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

/// # Timers
/// Two independent 8-bit countdown timers. The sound timer only carries a value;
/// a host may beep while it is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrements each timer that hasn't yet reached 0
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

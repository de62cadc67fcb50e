/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded into memory starting at this address and execution begins here
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// The glyph sheet is written to memory starting at this address
pub const GLYPH_START: u16 = 0x50;

/// Each glyph is 5 rows of 8 pixels
pub const GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of V registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// The register used for carry, borrow, shifted-out bits and sprite collisions
pub const FLAG_REGISTER: usize = 0xF;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

use std::fmt;

use crate::constants::{GLYPH_START, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Error, LoadError, Result};
use crate::sprites::SPRITE_SHEET;

/// # Memory
/// 4096 bytes of addressable memory.
///
/// ```text
/// 0x000 - 0x04F  unused
/// 0x050 - 0x09F  glyph sheet (16 glyphs x 5 bytes)
/// 0x0A0 - 0x1FF  unused
/// 0x200 - 0xFFF  program
/// ```
///
/// Accessors are bounds-checked but never adjust an address; anything touching
/// a byte at or past `MEMORY_SIZE` is an `Error::OutOfBounds`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Memory([u8; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = GLYPH_START as usize;
        bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory(bytes)
    }

    /// Copies a ROM into the program region.
    ///
    /// # Arguments
    /// * `rom` the raw program bytes; must be non-empty and no larger than `MAX_ROM_SIZE`
    pub fn load(&mut self, rom: &[u8]) -> std::result::Result<(), LoadError> {
        if rom.is_empty() {
            return Err(LoadError::Empty);
        }
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::TooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.0[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn read(&self, address: u16) -> Result<u8> {
        self.0
            .get(address as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address: address as usize,
            })
    }

    /// Borrows `len` bytes starting at `address`.
    pub fn slice(&self, address: u16, len: usize) -> Result<&[u8]> {
        let range = Memory::range(address, len)?;
        Ok(&self.0[range])
    }

    /// Mutably borrows `len` bytes starting at `address`.
    pub fn slice_mut(&mut self, address: u16, len: usize) -> Result<&mut [u8]> {
        let range = Memory::range(address, len)?;
        Ok(&mut self.0[range])
    }

    fn range(address: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = address as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // Report the first byte that doesn't exist
            Err(Error::OutOfBounds {
                address: start.max(MEMORY_SIZE),
            })
        } else {
            Ok(start..end)
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("size", &MEMORY_SIZE)
            .finish()
    }
}

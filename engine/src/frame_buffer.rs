use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Frame buffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The FrameBuffer is indexed as [y][x], so iterating it yields rows top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer([[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT]);

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer([[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT])
    }

    pub fn clear(&mut self) {
        *self = FrameBuffer::new();
    }

    /// Whether the pixel at (x, y) is on; coordinates wrap around the screen.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn rows(&self) -> &[[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.0
    }

    /// XORs a sprite onto the screen with its top left corner at (x, y).
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost. Every pixel
    /// wraps around the screen independently, so a sprite straddling an edge
    /// reappears on the opposite side.
    ///
    /// Returns true if any pixel that was on has been turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, &byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for col in 0..8 {
                if byte & (0x80u8 >> col) == 0 {
                    continue;
                }
                let px = (x + col) % DISPLAY_WIDTH;
                let pixel = &mut self.0[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

use sdl2::pixels::PixelFormatEnum;

use engine::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use engine::FrameBuffer;

/// Bytes per pixel of an RGB24 texture
const BYTES_PER_PIXEL: usize = 3;

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "Chip-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        log::debug!(
            "opened {}x{} window",
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale
        );

        Ok(Display { canvas })
    }

    /// Writes a Chip-8 FrameBuffer into an SDL2 RGB24 texture buffer.
    ///
    /// Rows of the texture are `pitch` bytes apart, which may be more than the
    /// 3 bytes per pixel a row strictly needs. Lit pixels are white, unlit black.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `buffer` the locked texture memory
    /// * `pitch` the length in bytes of one texture row
    fn frame_to_sdl_texture(frame: &FrameBuffer, buffer: &mut [u8], pitch: usize) {
        for (y, row) in frame.rows().iter().enumerate() {
            for (x, &pixel) in row.iter().enumerate() {
                let offset = y * pitch + x * BYTES_PER_PIXEL;
                let color = if pixel { 0xFF } else { 0x00 };
                buffer[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&[color; BYTES_PER_PIXEL]);
            }
        }
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            Display::frame_to_sdl_texture(frame, buffer, pitch);
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

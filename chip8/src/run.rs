use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use engine::{Chip8, LoadError};

use crate::keymap::keymap;

/// Everything a session needs from the command line
pub struct Options {
    pub rom: PathBuf,
    pub scale: u32,
    pub cycle_delay: Duration,
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("unable to read {path}: {source}")]
    Rom {
        path: PathBuf,
        source: engine::Error,
    },

    #[error("{0}")]
    Engine(#[from] engine::Error),

    #[error("SDL error: {0}")]
    Sdl(String),
}

impl From<String> for RunError {
    fn from(err: String) -> Self {
        RunError::Sdl(err)
    }
}

/// Loads a ROM file into a new Chip-8 session
fn load(options: &Options) -> Result<Chip8, RunError> {
    let rom_error = |source: engine::Error| RunError::Rom {
        path: options.rom.clone(),
        source,
    };
    let rom = fs::read(&options.rom).map_err(|e| rom_error(LoadError::Io(e).into()))?;
    let chip8 = match options.seed {
        Some(seed) => Chip8::with_seed(&rom, seed),
        None => Chip8::new(&rom),
    };
    chip8.map_err(rom_error)
}

/// Runs a ROM until the window is closed or the Chip-8 faults.
///
/// One CPU cycle runs at most once every `cycle_delay`; since the timers tick once per
/// cycle this also sets how quickly they count down.
pub fn run(options: Options) -> Result<(), RunError> {
    let mut chip8 = load(&options)?;

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, options.scale)?;
    let mut events = sdl.event_pump()?;

    let mut last_cycle = Instant::now();
    let mut sounding = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if elapsed_cycle_time >= options.cycle_delay {
            last_cycle = current_time;
            chip8.step()?;

            if chip8.is_sound_active() != sounding {
                sounding = chip8.is_sound_active();
                log::debug!("sound {}", if sounding { "on" } else { "off" });
            }
        }

        // If the frame changed, render it
        if let Some(frame) = chip8.get_frame() {
            display.render(frame)?;
        }

        // Handle timing
        let elapsed_cycle_time = Instant::now() - last_cycle;
        if options.cycle_delay > elapsed_cycle_time {
            std::thread::sleep(options.cycle_delay - elapsed_cycle_time);
        }
    }

    log::info!("window closed");
    Ok(())
}

use std::io::Read;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, REGISTER_COUNT};
use crate::error::{LoadError, Result};
use crate::frame_buffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::operations::{self, Keypad};
use crate::state::{Mode, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// One `Chip8` runs one ROM; there is no reset, start a new session with a new instance.
///
/// Tracks:
///  - current `state`
///  - `keypad` with public interfaces for manipulating it
///  - `rng`, the source of random bytes for `Cxkk`
///
/// Supplies interfaces for:
/// - pressing and releasing keys
/// - advancing the CPU and its timers one cycle at a time
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: StdRng,
}

impl Chip8 {
    /// Starts a session for `rom` with randomness seeded from the OS.
    pub fn new(rom: &[u8]) -> Result<Self> {
        Chip8::with_rng(rom, StdRng::from_entropy())
    }

    /// Starts a session for `rom` whose random bytes are reproducible from `seed`.
    pub fn with_seed(rom: &[u8], seed: u64) -> Result<Self> {
        Chip8::with_rng(rom, StdRng::seed_from_u64(seed))
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    /// * `seed` makes random bytes reproducible when given
    pub fn from_reader(reader: &mut dyn Read, seed: Option<u64>) -> Result<Self> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom).map_err(LoadError::from)?;
        match seed {
            Some(seed) => Chip8::with_seed(&rom, seed),
            None => Chip8::new(&rom),
        }
    }

    fn with_rng(rom: &[u8], rng: StdRng) -> Result<Self> {
        let mut state = State::new();
        state.memory.load(rom)?;
        log::info!("loaded {} byte ROM", rom.len());
        Ok(Chip8 {
            state,
            keypad: [false; KEY_COUNT],
            rng,
        })
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad[(key & 0xF) as usize] = false;
    }

    /// Replace the pressed status of every key at once
    pub fn set_keypad(&mut self, keypad: Keypad) {
        self.keypad = keypad;
    }

    /// Advances the CPU by a single cycle
    /// - polls the keypad if awaiting a keypress, otherwise
    ///   gets, decodes and executes the next opcode
    /// - then ticks both timers
    ///
    /// If the cycle faults nothing is committed, timers included.
    pub fn step(&mut self) -> Result<()> {
        let next = match self.state.mode {
            Mode::AwaitingKey { register } => {
                let next = operations::resume(&self.state, register, &self.keypad);
                if next.mode == Mode::Running {
                    log::debug!("V{:X} received key {:X}", register, next.v[register as usize]);
                }
                next
            }
            Mode::Running => {
                let op = self.state.fetch()?;
                let instruction = Instruction::decode(op)?;
                log::trace!(
                    "{:04X}: {} {:<16} v{:02X?} i{:04X}",
                    self.state.pc,
                    op,
                    instruction.to_string(),
                    self.state.v,
                    self.state.i
                );
                let next = instruction.execute(&self.state, &self.keypad, &mut self.rng)?;
                if let Mode::AwaitingKey { register } = next.mode {
                    log::debug!("V{:X} waiting for a key", register);
                }
                next
            }
        };
        self.state = next;
        self.state.timers.tick();
        Ok(())
    }

    /// Returns the FrameBuffer if it changed since the last call
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether a host should currently be sounding its tone
    pub fn is_sound_active(&self) -> bool {
        self.state.timers.sound > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.state.v
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StackFault};
    use crate::operations::rnd;

    /// Flattens opcodes into ROM bytes, high byte first
    fn rom(ops: &[u16]) -> Vec<u8> {
        ops.iter().flat_map(|op| op.to_be_bytes().to_vec()).collect()
    }

    #[test]
    fn test_load_and_add() {
        let mut chip8 = Chip8::with_seed(&[0x60, 0x05, 0x70, 0x03], 0).unwrap();
        let starting_pc = chip8.pc();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.registers()[0x0], 0x8);
        assert_eq!(chip8.pc(), starting_pc + 0x4);
    }

    #[test]
    fn test_new_rejects_empty_rom() {
        assert!(matches!(
            Chip8::with_seed(&[], 0),
            Err(Error::Load(LoadError::Empty))
        ));
    }

    #[test]
    fn test_new_rejects_oversized_rom() {
        assert!(matches!(
            Chip8::with_seed(&[0x0; 3585], 0),
            Err(Error::Load(LoadError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_from_reader() {
        let mut reader: &[u8] = &[0x61, 0x2A];
        let mut chip8 = Chip8::from_reader(&mut reader, Some(1)).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.registers()[0x1], 0x2A);
    }

    #[test]
    fn test_unknown_opcode_faults_without_committing() {
        let mut chip8 = Chip8::with_seed(&rom(&[0x6F15, 0x5121]), 0).unwrap();
        chip8.step().unwrap();
        let before = *chip8.state();
        match chip8.step() {
            Err(Error::UnknownOpcode(op)) => assert_eq!(op.0, 0x5121),
            other => panic!("expected an unknown opcode, got {:?}", other),
        }
        assert_eq!(*chip8.state(), before);
    }

    #[test]
    fn test_running_off_the_end_of_memory_faults() {
        // 0xFFF holds a lone byte; an opcode there would straddle the end of memory
        let mut chip8 = Chip8::with_seed(&rom(&[0x1FFF]), 0).unwrap();
        chip8.step().unwrap();
        assert!(matches!(
            chip8.step(),
            Err(Error::OutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_call_then_return_is_a_control_flow_noop() {
        // 0x200: CALL 0x206; 0x202: LD V0, 1; ...; 0x206: RET
        let mut chip8 = Chip8::with_seed(&rom(&[0x2206, 0x6001, 0x0000, 0x00EE]), 0).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x206);
        assert_eq!(chip8.state().stack.sp(), 1);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x202);
        assert_eq!(chip8.state().stack.sp(), 0);
        chip8.step().unwrap();
        assert_eq!(chip8.registers()[0x0], 0x1);
    }

    #[test]
    fn test_seventeenth_nested_call_overflows() {
        // Every instruction calls the next one
        let calls: Vec<u16> = (0..17).map(|n| 0x2202 + 2 * n).collect();
        let mut chip8 = Chip8::with_seed(&rom(&calls), 0).unwrap();
        for _ in 0..16 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state().stack.sp(), 16);
        assert!(matches!(
            chip8.step(),
            Err(Error::Stack(StackFault::Overflow { .. }))
        ));
        assert_eq!(chip8.state().stack.sp(), 16);
    }

    #[test]
    fn test_return_with_empty_stack_underflows() {
        let mut chip8 = Chip8::with_seed(&rom(&[0x00EE]), 0).unwrap();
        assert!(matches!(
            chip8.step(),
            Err(Error::Stack(StackFault::Underflow))
        ));
    }

    #[test]
    fn test_timers_tick_once_per_step() {
        // LD V0, 3; LD DT, V0; LD ST, V0; then spin
        let mut chip8 = Chip8::with_seed(&rom(&[0x6003, 0xF015, 0xF018, 0x1206]), 0).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state().timers.delay, 2);
        chip8.step().unwrap();
        assert_eq!(chip8.state().timers.delay, 1);
        assert_eq!(chip8.state().timers.sound, 2);
        assert!(chip8.is_sound_active());
        for _ in 0..4 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state().timers.delay, 0);
        assert_eq!(chip8.state().timers.sound, 0);
        assert!(!chip8.is_sound_active());
    }

    #[test]
    fn test_waits_for_key() {
        let mut chip8 = Chip8::with_seed(&rom(&[0x6003, 0xF015, 0xF50A]), 0).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        for _ in 0..5 {
            chip8.step().unwrap();
            assert_eq!(chip8.pc(), 0x204);
            assert_eq!(chip8.mode(), Mode::AwaitingKey { register: 0x5 });
        }
        // Timers keep running while parked
        assert_eq!(chip8.state().timers.delay, 0);

        chip8.key_press(0xC);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x206);
        assert_eq!(chip8.registers()[0x5], 0xC);
        assert_eq!(chip8.mode(), Mode::Running);
    }

    #[test]
    fn test_key_release() {
        let mut chip8 = Chip8::with_seed(&rom(&[0xE09E]), 0).unwrap();
        chip8.key_press(0x0);
        chip8.key_release(0x0);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_set_keypad() {
        let mut chip8 = Chip8::with_seed(&rom(&[0xE09E]), 0).unwrap();
        let mut keypad = [false; 16];
        keypad[0x0] = true;
        chip8.set_keypad(keypad);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x204);
    }

    #[test]
    fn test_seeded_random_bytes_are_reproducible() {
        let program = rom(&[0xC0FF, 0xC1FF, 0xC2FF]);
        let mut a = Chip8::with_seed(&program, 99).unwrap();
        let mut b = Chip8::with_seed(&program, 99).unwrap();
        for _ in 0..3 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.registers(), b.registers());

        let mut rng = StdRng::seed_from_u64(99);
        let expected = rnd(&State::new(), 0x0, 0xFF, &mut rng).v[0x0];
        assert_eq!(a.registers()[0x0], expected);
    }

    #[test]
    fn test_get_frame_only_after_draw() {
        // CLS; LD F, V0; DRW V0, V0, 5
        let mut chip8 = Chip8::with_seed(&rom(&[0x00E0, 0xF029, 0xD005]), 0).unwrap();
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        let frame = chip8.get_frame().unwrap();
        assert!(frame.pixel(0, 0));
        assert!(frame.pixel(3, 4));
        assert!(!frame.pixel(1, 1));
    }

    #[test]
    fn test_clear_leaves_every_pixel_off() {
        let mut chip8 = Chip8::with_seed(&rom(&[0xF029, 0xD005, 0x00E0]), 0).unwrap();
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert!(chip8.frame_buffer().rows().iter().flatten().all(|&p| !p));
    }

    #[test]
    fn test_bcd_through_step() {
        // LD V3, 156; LD I, 0x300; LD B, V3
        let mut chip8 = Chip8::with_seed(&rom(&[0x639C, 0xA300, 0xF333]), 0).unwrap();
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state().memory.slice(0x300, 3).unwrap(), &[1, 5, 6]);
    }
}

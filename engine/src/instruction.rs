use std::fmt;

use rand::RngCore;

use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// # Instructions
/// The 35 instructions of the base Chip-8 instruction set, with their operands
/// already pulled out of the opcode.
///
/// `x` and `y` name registers, `kk` is an immediate byte, `addr` a 12-bit address
/// and `n` a 4-bit sprite height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqImm { x: u8, kk: u8 },
    /// 4xkk
    SkipNeImm { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    Copy { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubN { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex { addr: u16 },
    /// Bnnn
    JumpOffset { addr: u16 },
    /// Cxkk
    RandAnd { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipPressed { x: u8 },
    /// ExA1
    SkipNotPressed { x: u8 },
    /// Fx07
    ReadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    GlyphAddr { x: u8 },
    /// Fx33
    Bcd { x: u8 },
    /// Fx55
    StoreRegs { x: u8 },
    /// Fx65
    LoadRegs { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    ///
    /// The most significant nibble picks a category; categories 0, 8, E and F
    /// are decoded further on their low nibble or low byte.
    pub fn decode(op: Opcode) -> Result<Self> {
        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.high() {
            0x0 => return Instruction::decode_system(op),
            0x1 => Instruction::Jump { addr },
            0x2 => Instruction::Call { addr },
            0x3 => Instruction::SkipEqImm { x, kk },
            0x4 => Instruction::SkipNeImm { x, kk },
            0x5 if n == 0x0 => Instruction::SkipEqReg { x, y },
            0x6 => Instruction::LoadImm { x, kk },
            0x7 => Instruction::AddImm { x, kk },
            0x8 => return Instruction::decode_alu(op),
            0x9 if n == 0x0 => Instruction::SkipNeReg { x, y },
            0xA => Instruction::LoadIndex { addr },
            0xB => Instruction::JumpOffset { addr },
            0xC => Instruction::RandAnd { x, kk },
            0xD => Instruction::Draw { x, y, n },
            0xE => return Instruction::decode_keys(op),
            0xF => return Instruction::decode_misc(op),
            _ => return Err(Error::UnknownOpcode(op)),
        };
        Ok(instruction)
    }

    /// 0___
    fn decode_system(op: Opcode) -> Result<Self> {
        match op.nnn() {
            0x0E0 => Ok(Instruction::Clear),
            0x0EE => Ok(Instruction::Return),
            _ => Err(Error::UnknownOpcode(op)),
        }
    }

    /// 8xy_
    fn decode_alu(op: Opcode) -> Result<Self> {
        let (x, y) = (op.x(), op.y());
        let instruction = match op.n() {
            0x0 => Instruction::Copy { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::AddReg { x, y },
            0x5 => Instruction::Sub { x, y },
            0x6 => Instruction::ShiftRight { x },
            0x7 => Instruction::SubN { x, y },
            0xE => Instruction::ShiftLeft { x },
            _ => return Err(Error::UnknownOpcode(op)),
        };
        Ok(instruction)
    }

    /// Ex__
    fn decode_keys(op: Opcode) -> Result<Self> {
        let x = op.x();
        match op.kk() {
            0x9E => Ok(Instruction::SkipPressed { x }),
            0xA1 => Ok(Instruction::SkipNotPressed { x }),
            _ => Err(Error::UnknownOpcode(op)),
        }
    }

    /// Fx__
    fn decode_misc(op: Opcode) -> Result<Self> {
        let x = op.x();
        let instruction = match op.kk() {
            0x07 => Instruction::ReadDelay { x },
            0x0A => Instruction::WaitKey { x },
            0x15 => Instruction::SetDelay { x },
            0x18 => Instruction::SetSound { x },
            0x1E => Instruction::AddIndex { x },
            0x29 => Instruction::GlyphAddr { x },
            0x33 => Instruction::Bcd { x },
            0x55 => Instruction::StoreRegs { x },
            0x65 => Instruction::LoadRegs { x },
            _ => return Err(Error::UnknownOpcode(op)),
        };
        Ok(instruction)
    }

    /// Applies the instruction to `state`, producing the next state.
    ///
    /// # Arguments
    /// * `state` the state before execution; left untouched if execution faults
    /// * `keypad` the pressed status of keys 0..F
    /// * `rng` the source of random bytes for `Cxkk`
    pub fn execute(self, state: &State, keypad: &Keypad, rng: &mut dyn RngCore) -> Result<State> {
        let next = match self {
            Instruction::Clear => clr(state),
            Instruction::Return => rts(state)?,
            Instruction::Jump { addr } => jump(state, addr),
            Instruction::Call { addr } => call(state, addr)?,
            Instruction::SkipEqImm { x, kk } => ske(state, x, kk),
            Instruction::SkipNeImm { x, kk } => skne(state, x, kk),
            Instruction::SkipEqReg { x, y } => skre(state, x, y),
            Instruction::LoadImm { x, kk } => load(state, x, kk),
            Instruction::AddImm { x, kk } => add(state, x, kk),
            Instruction::Copy { x, y } => mv(state, x, y),
            Instruction::Or { x, y } => or(state, x, y),
            Instruction::And { x, y } => and(state, x, y),
            Instruction::Xor { x, y } => xor(state, x, y),
            Instruction::AddReg { x, y } => addr(state, x, y),
            Instruction::Sub { x, y } => sub(state, x, y),
            Instruction::ShiftRight { x } => shr(state, x),
            Instruction::SubN { x, y } => subn(state, x, y),
            Instruction::ShiftLeft { x } => shl(state, x),
            Instruction::SkipNeReg { x, y } => skrne(state, x, y),
            Instruction::LoadIndex { addr } => loadi(state, addr),
            Instruction::JumpOffset { addr } => jumpi(state, addr),
            Instruction::RandAnd { x, kk } => rnd(state, x, kk, rng),
            Instruction::Draw { x, y, n } => draw(state, x, y, n)?,
            Instruction::SkipPressed { x } => skpr(state, x, keypad),
            Instruction::SkipNotPressed { x } => skup(state, x, keypad),
            Instruction::ReadDelay { x } => moved(state, x),
            Instruction::WaitKey { x } => keyd(state, x, keypad),
            Instruction::SetDelay { x } => loads(state, x),
            Instruction::SetSound { x } => ld(state, x),
            Instruction::AddIndex { x } => addi(state, x),
            Instruction::GlyphAddr { x } => ldspr(state, x),
            Instruction::Bcd { x } => bcd(state, x)?,
            Instruction::StoreRegs { x } => stor(state, x)?,
            Instruction::LoadRegs { x } => read(state, x)?,
        };
        Ok(next)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { addr } => write!(f, "JP {:03X}", addr),
            Instruction::Call { addr } => write!(f, "CALL {:03X}", addr),
            Instruction::SkipEqImm { x, kk } => write!(f, "SE V{:X}, {:02X}", x, kk),
            Instruction::SkipNeImm { x, kk } => write!(f, "SNE V{:X}, {:02X}", x, kk),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadImm { x, kk } => write!(f, "LD V{:X}, {:02X}", x, kk),
            Instruction::AddImm { x, kk } => write!(f, "ADD V{:X}, {:02X}", x, kk),
            Instruction::Copy { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x } => write!(f, "SHR V{:X}", x),
            Instruction::SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            Instruction::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex { addr } => write!(f, "LD I, {:03X}", addr),
            Instruction::JumpOffset { addr } => write!(f, "JP V0, {:03X}", addr),
            Instruction::RandAnd { x, kk } => write!(f, "RND V{:X}, {:02X}", x, kk),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Instruction::SkipPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Instruction::ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::GlyphAddr { x } => write!(f, "LD F, V{:X}", x),
            Instruction::Bcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

use rand::RngCore;

use crate::constants::{FLAG_REGISTER, GLYPH_SIZE, GLYPH_START, KEY_COUNT};
use crate::error::Result;
use crate::state::{Mode, State};

/// The pressed status of keys 0..F
pub type Keypad = [bool; KEY_COUNT];

/// clear
pub fn clr(state: &State) -> State {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    State {
        pc: state.pc + 0x2,
        frame_buffer,
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
/// The popped address is that of the call itself, so step past it
pub fn rts(state: &State) -> Result<State> {
    let mut stack = state.stack;
    let pc = stack.pop()?;
    Ok(State {
        pc: pc + 0x2,
        stack,
        ..*state
    })
}

/// PC = addr
pub fn jump(state: &State, addr: u16) -> State {
    State { pc: addr, ..*state }
}

/// STACK.push(PC); PC = addr
pub fn call(state: &State, addr: u16) -> Result<State> {
    let mut stack = state.stack;
    stack.push(state.pc)?;
    Ok(State {
        pc: addr,
        stack,
        ..*state
    })
}

/// Step past the current instruction, and the next one too if `condition` holds
fn skip_if(state: &State, condition: bool) -> State {
    let pc = if condition {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    State { pc, ..*state }
}

/// if Vx == kk then pc += 2
pub fn ske(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] == kk)
}

/// if Vx != kk then pc += 2
pub fn skne(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] != kk)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] == state.v[y as usize])
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] != state.v[y as usize])
}

/// Vx = kk
pub fn load(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = kk;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn mv(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = f(Vx, Vy); VF = 0
/// The flag is reset after the result is written, so VF as a destination ends up 0
fn logical(state: &State, x: u8, y: u8, f: impl Fn(u8, u8) -> u8) -> State {
    let mut v = state.v;
    v[x as usize] = f(v[x as usize], v[y as usize]);
    v[FLAG_REGISTER] = 0x0;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx |= Vy; VF = 0
pub fn or(state: &State, x: u8, y: u8) -> State {
    logical(state, x, y, |a, b| a | b)
}

/// Vx &= Vy; VF = 0
pub fn and(state: &State, x: u8, y: u8) -> State {
    logical(state, x, y, |a, b| a & b)
}

/// Vx ^= Vy; VF = 0
pub fn xor(state: &State, x: u8, y: u8) -> State {
    logical(state, x, y, |a, b| a ^ b)
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &State, x: u8, y: u8) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(over);
    v[x as usize] = res;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx -= Vy; VF = !borrow
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(vx >= vy);
    v[x as usize] = vx.wrapping_sub(vy);
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx /= 2; VF = underflow
pub fn shr(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[FLAG_REGISTER] = state.v[x as usize] & 0x1;
    v[x as usize] = state.v[x as usize] >> 1;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(vy >= vx);
    v[x as usize] = vy.wrapping_sub(vx);
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx *= 2; VF = overflow
pub fn shl(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[FLAG_REGISTER] = state.v[x as usize] >> 7;
    v[x as usize] = state.v[x as usize] << 1;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// I = addr
pub fn loadi(state: &State, addr: u16) -> State {
    State {
        pc: state.pc + 0x2,
        i: addr,
        ..*state
    }
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> State {
    State {
        pc: u16::from(state.v[0x0]) + addr,
        ..*state
    }
}

/// Vx = rand_byte & kk
pub fn rnd(state: &State, x: u8, kk: u8, rng: &mut dyn RngCore) -> State {
    let rand_byte = (rng.next_u32() & 0xFF) as u8;
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position Vx, Vy on the FrameBuffer with wrapping.
/// VF is set if any pixels were erased and cleared otherwise
pub fn draw(state: &State, x: u8, y: u8, n: u8) -> Result<State> {
    let sprite = state.memory.slice(state.i, n as usize)?;
    let mut frame_buffer = state.frame_buffer;
    let collision = frame_buffer.draw_sprite(
        state.v[x as usize] as usize,
        state.v[y as usize] as usize,
        sprite,
    );
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(collision);
    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Whether the key named by Vx is held; only the low nibble of Vx names a key
fn key_held(state: &State, x: u8, keypad: &Keypad) -> bool {
    keypad[(state.v[x as usize] & 0xF) as usize]
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &State, x: u8, keypad: &Keypad) -> State {
    skip_if(state, key_held(state, x, keypad))
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &State, x: u8, keypad: &Keypad) -> State {
    skip_if(state, !key_held(state, x, keypad))
}

/// Vx = DT
pub fn moved(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[x as usize] = state.timers.delay;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = first held key
/// If no key is held the pc stays put and the CPU parks until `resume` sees one
pub fn keyd(state: &State, x: u8, keypad: &Keypad) -> State {
    match first_held(keypad) {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key;
            State {
                pc: state.pc + 0x2,
                v,
                ..*state
            }
        }
        None => State {
            mode: Mode::AwaitingKey { register: x },
            ..*state
        },
    }
}

/// Polls the keypad once on behalf of a parked `keyd`
pub fn resume(state: &State, register: u8, keypad: &Keypad) -> State {
    match first_held(keypad) {
        Some(_) => State {
            mode: Mode::Running,
            ..keyd(state, register, keypad)
        },
        None => *state,
    }
}

fn first_held(keypad: &Keypad) -> Option<u8> {
    keypad.iter().position(|&held| held).map(|key| key as u8)
}

/// DT = Vx
pub fn loads(state: &State, x: u8) -> State {
    let mut timers = state.timers;
    timers.delay = state.v[x as usize];
    State {
        pc: state.pc + 0x2,
        timers,
        ..*state
    }
}

/// ST = Vx
pub fn ld(state: &State, x: u8) -> State {
    let mut timers = state.timers;
    timers.sound = state.v[x as usize];
    State {
        pc: state.pc + 0x2,
        timers,
        ..*state
    }
}

/// I += Vx
pub fn addi(state: &State, x: u8) -> State {
    State {
        pc: state.pc + 0x2,
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    }
}

/// I = GLYPH_START + Vx * 5
/// Set I to the memory address of the glyph for Vx
/// See sprites::SPRITE_SHEET for more details
pub fn ldspr(state: &State, x: u8) -> State {
    State {
        pc: state.pc + 0x2,
        i: GLYPH_START + u16::from(state.v[x as usize]) * GLYPH_SIZE,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &State, x: u8) -> Result<State> {
    let value = state.v[x as usize];
    let mut memory = state.memory;
    memory
        .slice_mut(state.i, 3)?
        .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &State, x: u8) -> Result<State> {
    let count = x as usize + 1;
    let mut memory = state.memory;
    memory
        .slice_mut(state.i, count)?
        .copy_from_slice(&state.v[..count]);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &State, x: u8) -> Result<State> {
    let count = x as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.memory.slice(state.i, count)?);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

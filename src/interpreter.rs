//! # interpreter
//!
//! One call to cycle() is one CHIP-8 instruction:
//!  1. fetch the big-endian word at pc
//!  2. decode it (see instruction.rs); nothing is touched if it's unknown
//!  3. execute it against the machine state
//!
//! Anything that can fail (stack, memory, keypad indices) is checked before
//! state is changed, so an Err leaves the machine exactly as it was before
//! the instruction.
//!
//! Timers are not ticked here. The host calls tick_timers() at 60Hz from its
//! own clock, however fast it happens to be running cycles.
//!
//! Fx0A doesn't block. It parks the register number in the machine's
//! key-wait slot and returns; subsequent cycles just look at the keypad until
//! something is held, then finish the instruction.

use crate::error::Result;
use crate::framebuffer::WIDTH;
use crate::instruction::Instruction;
use crate::machine::{Machine, FLAG};
use crate::memory::{MemoryMap, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES};
use crate::timer::TimerEvent;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// what a successful cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Executed(Instruction),
    /// parked on Fx0A; pc hasn't moved
    AwaitingKey,
}

pub struct Chip8Interpreter {
    machine: Machine,
    rng: StdRng,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Chip8Interpreter {
            machine: Machine::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Cxnn becomes reproducible
    pub fn with_seed(seed: u64) -> Self {
        Chip8Interpreter {
            machine: Machine::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// load a chip8 program at 0x200; the rest of the machine is untouched,
    /// so reset() first when reusing an interpreter
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.machine.memory.load_program(program)?;
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn load_from(&mut self, reader: &mut impl io::Read) -> Result<()> {
        self.machine.memory.load_from(reader)?;
        info!("loaded program");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        self.machine.keypad.set(key, pressed)
    }

    /// 60Hz timer tick
    pub fn tick_timers(&mut self) -> Option<TimerEvent> {
        let event = self.machine.timers.tick();
        if let Some(e) = event {
            debug!("{:?}", e);
        }
        event
    }

    pub fn sound_active(&self) -> bool {
        self.machine.timers.sound_active()
    }

    /// fetch, decode and execute one instruction
    pub fn cycle(&mut self) -> Result<CycleState> {
        if let Some(x) = self.machine.key_wait {
            return Ok(self.poll_key_wait(x));
        }

        let pc = self.machine.pc;
        let word = self.machine.memory.get_word(pc)?;
        let instruction = Instruction::decode(word)?;
        trace!("{:#05x}: {:04x} {:?}", pc, word, instruction);

        self.execute(instruction)?;
        if self.machine.key_wait.is_some() {
            Ok(CycleState::AwaitingKey)
        } else {
            Ok(CycleState::Executed(instruction))
        }
    }

    fn poll_key_wait(&mut self, x: u8) -> CycleState {
        match self.machine.keypad.first_pressed() {
            Some(key) => {
                self.machine.v[x as usize] = key;
                self.machine.key_wait = None;
                self.next();
                CycleState::Executed(Instruction::WaitKey { x })
            }
            None => CycleState::AwaitingKey,
        }
    }

    fn next(&mut self) {
        self.machine.pc = self.machine.pc.wrapping_add(2);
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.next();
        }
        self.next();
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        let m = &mut self.machine;
        match instruction {
            ClearScreen => {
                m.framebuffer.clear();
                self.next();
            }
            Return => {
                m.pc = m.pop()?;
                self.next();
            }
            Jump(nnn) => m.pc = nnn,
            Call(nnn) => {
                m.push(m.pc)?;
                m.pc = nnn;
            }
            SkipEqImm { x, nn } => {
                let cond = m.v[x as usize] == nn;
                self.skip_if(cond);
            }
            SkipNeImm { x, nn } => {
                let cond = m.v[x as usize] != nn;
                self.skip_if(cond);
            }
            SkipEqReg { x, y } => {
                let cond = m.v[x as usize] == m.v[y as usize];
                self.skip_if(cond);
            }
            SkipNeReg { x, y } => {
                let cond = m.v[x as usize] != m.v[y as usize];
                self.skip_if(cond);
            }
            LoadImm { x, nn } => {
                m.v[x as usize] = nn;
                self.next();
            }
            AddImm { x, nn } => {
                m.v[x as usize] = m.v[x as usize].wrapping_add(nn);
                self.next();
            }
            Move { x, y } => {
                m.v[x as usize] = m.v[y as usize];
                self.next();
            }
            Or { x, y } => {
                m.v[x as usize] |= m.v[y as usize];
                self.next();
            }
            And { x, y } => {
                m.v[x as usize] &= m.v[y as usize];
                self.next();
            }
            Xor { x, y } => {
                m.v[x as usize] ^= m.v[y as usize];
                self.next();
            }
            AddReg { x, y } => {
                let (sum, carry) = m.v[x as usize].overflowing_add(m.v[y as usize]);
                m.set_with_flag(x, sum, carry);
                self.next();
            }
            SubReg { x, y } => {
                let (vx, vy) = (m.v[x as usize], m.v[y as usize]);
                m.set_with_flag(x, vx.wrapping_sub(vy), vy <= vx);
                self.next();
            }
            SubRegReversed { x, y } => {
                let (vx, vy) = (m.v[x as usize], m.v[y as usize]);
                m.set_with_flag(x, vy.wrapping_sub(vx), vx <= vy);
                self.next();
            }
            ShiftRight { x } => {
                let vx = m.v[x as usize];
                m.set_with_flag(x, vx >> 1, vx & 0x01 == 1);
                self.next();
            }
            ShiftLeft { x } => {
                let vx = m.v[x as usize];
                m.set_with_flag(x, vx << 1, vx >> 7 == 1);
                self.next();
            }
            LoadIndex(nnn) => {
                m.i = nnn;
                self.next();
            }
            JumpOffset(nnn) => m.pc = nnn + m.v[0] as u16,
            Random { x, nn } => {
                m.v[x as usize] = self.rng.gen::<u8>() & nn;
                self.next();
            }
            Draw { x, y, n } => {
                self.draw_sprite(x, y, n)?;
                self.next();
            }
            SkipKeyPressed { x } => {
                let cond = m.keypad.is_pressed(m.v[x as usize])?;
                self.skip_if(cond);
            }
            SkipKeyReleased { x } => {
                let cond = !m.keypad.is_pressed(m.v[x as usize])?;
                self.skip_if(cond);
            }
            ReadDelay { x } => {
                m.v[x as usize] = m.timers.delay;
                self.next();
            }
            WaitKey { x } => match m.keypad.first_pressed() {
                Some(key) => {
                    m.v[x as usize] = key;
                    self.next();
                }
                None => {
                    debug!("waiting for a key into V{:X}", x);
                    m.key_wait = Some(x);
                }
            },
            SetDelay { x } => {
                m.timers.delay = m.v[x as usize];
                self.next();
            }
            SetSound { x } => {
                m.timers.sound = m.v[x as usize];
                self.next();
            }
            AddIndex { x } => {
                m.i = m.i.wrapping_add(m.v[x as usize] as u16);
                self.next();
            }
            FontGlyph { x } => {
                m.i = CHIP8_FONT_ADDR + m.v[x as usize] as u16 * CHIP8_FONT_GLYPH_BYTES;
                self.next();
            }
            StoreBcd { x } => {
                let vx = m.v[x as usize];
                m.memory
                    .write(&[vx / 100, (vx % 100) / 10, vx % 10], m.i)?;
                self.next();
            }
            StoreRegs { x } => {
                m.memory.write(&m.v[..=x as usize], m.i)?;
                self.next();
            }
            LoadRegs { x } => {
                let len = x as usize + 1;
                let src = m.memory.get_ro_slice(m.i, len)?;
                m.v[..len].copy_from_slice(src);
                self.next();
            }
        }
        Ok(())
    }

    /// XOR n rows of sprite data from I onto the screen at (Vx, Vy). The
    /// destination index is x + dx + (y + dy) * 64, so a sprite running off
    /// the right edge continues on the next row down; anything past the last
    /// cell is dropped.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<()> {
        let m = &mut self.machine;
        let (vx, vy) = (m.v[x as usize] as usize, m.v[y as usize] as usize);
        let sprite = m.memory.get_ro_slice(m.i, n as usize)?;

        let mut collision = false;
        for (dy, row) in sprite.iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80 >> dx) != 0 {
                    let idx = vx + dx + (vy + dy) * WIDTH;
                    collision |= m.framebuffer.toggle(idx).unwrap_or(false);
                }
            }
        }
        m.v[FLAG] = collision as u8;
        m.framebuffer.mark_dirty();
        Ok(())
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Chip8Error;
    use crate::instruction::Instruction::*;

    fn run(program: &[u8]) -> Chip8Interpreter {
        let mut i = Chip8Interpreter::with_seed(8);
        i.load_program(program).unwrap();
        i
    }

    #[test]
    fn test_program_load_ok() -> Result<()> {
        let mut i = Chip8Interpreter::new();
        i.load_program(&[0x00, 0xe0]) // clear screen
    }

    #[test]
    fn test_load_from_reader() -> Result<()> {
        let mut i = Chip8Interpreter::new();
        let mut prog: &[u8] = &[0x12, 0x00];
        i.load_from(&mut prog)?;
        assert_eq!(i.cycle()?, CycleState::Executed(Jump(0x200)));
        Ok(())
    }

    #[test]
    fn test_load_imm() -> Result<()> {
        let mut i = run(&[0x60, 0x0a]);
        i.cycle()?;
        assert_eq!(i.machine().v(0), 10);
        assert_eq!(i.machine().pc(), 0x202);
        Ok(())
    }

    #[test]
    fn test_clear_screen() -> Result<()> {
        let mut i = run(&[0x00, 0xe0]);
        i.machine_mut().framebuffer_mut().cells_mut().fill(1);
        i.cycle()?;
        let fb = i.machine().framebuffer();
        assert!(fb.cells().iter().all(|c| *c == 0));
        assert!(fb.draw_pending());
        assert_eq!(i.machine().pc(), 0x202);
        Ok(())
    }

    #[test]
    fn test_return_underflow_leaves_state() {
        let mut i = run(&[0x00, 0xee]);
        let res = i.cycle();
        assert!(matches!(res, Err(Chip8Error::StackUnderflow { pc: 0x200 })));
        assert_eq!(i.machine().pc(), 0x200);
        assert_eq!(i.machine().sp(), 0);
    }

    #[test]
    fn test_call_then_return() -> Result<()> {
        // 0x200: call 0x300; 0x300: return
        let mut i = run(&[0x23, 0x00]);
        i.machine_mut().memory_mut().write(&[0x00, 0xee], 0x300)?;
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x300);
        assert_eq!(i.machine().stack(), &[0x200]);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x202);
        assert_eq!(i.machine().sp(), 0);
        Ok(())
    }

    #[test]
    fn test_call_overflow() {
        // calls itself forever
        let mut i = run(&[0x22, 0x00]);
        for _ in 0..16 {
            i.cycle().unwrap();
        }
        assert!(matches!(i.cycle(), Err(Chip8Error::StackOverflow { .. })));
        assert_eq!(i.machine().sp(), 16);
    }

    #[test]
    fn test_skip_eq_imm() -> Result<()> {
        let mut i = run(&[0x31, 0xff]);
        i.machine_mut().set_v(1, 0xff);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x204);

        let mut i = run(&[0x31, 0xff]);
        i.machine_mut().set_v(1, 0x01);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x202);
        Ok(())
    }

    #[test]
    fn test_skip_ne_imm() -> Result<()> {
        let mut i = run(&[0x41, 0xff]);
        i.machine_mut().set_v(1, 0xff);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x202);

        let mut i = run(&[0x41, 0xff]);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x204);
        Ok(())
    }

    #[test]
    fn test_skip_regs() -> Result<()> {
        let mut i = run(&[0x51, 0x20, 0x00, 0x00, 0x91, 0x20]);
        i.cycle()?; // V1 == V2 == 0
        assert_eq!(i.machine().pc(), 0x204);
        i.cycle()?; // not different
        assert_eq!(i.machine().pc(), 0x206);
        Ok(())
    }

    #[test]
    fn test_add_imm_leaves_flag() -> Result<()> {
        let mut i = run(&[0x71, 0xfe]);
        i.machine_mut().set_v(1, 2);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0);
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_logic_ops() -> Result<()> {
        let mut i = run(&[0x81, 0x21, 0x83, 0x22, 0x84, 0x23, 0x85, 0x20]);
        let m = i.machine_mut();
        m.set_v(1, 0x0f);
        m.set_v(2, 0xf0);
        m.set_v(3, 0xff);
        m.set_v(4, 0xff);
        for _ in 0..4 {
            i.cycle()?;
        }
        let m = i.machine();
        assert_eq!(m.v(1), 0xff);
        assert_eq!(m.v(3), 0xf0);
        assert_eq!(m.v(4), 0x0f);
        assert_eq!(m.v(5), 0xf0);
        Ok(())
    }

    #[test]
    fn test_add_with_carry() -> Result<()> {
        let mut i = run(&[0x81, 0x24, 0x81, 0x24]);
        i.machine_mut().set_v(1, 0xff);
        i.machine_mut().set_v(2, 0x01);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0x00);
        assert_eq!(i.machine().v(0xf), 1);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0x01);
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_sub_borrow() -> Result<()> {
        let mut i = run(&[0x81, 0x25]);
        i.machine_mut().set_v(1, 0x01);
        i.machine_mut().set_v(2, 0x02);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0xff);
        assert_eq!(i.machine().v(0xf), 0);

        let mut i = run(&[0x81, 0x25]);
        i.machine_mut().set_v(1, 0x02);
        i.machine_mut().set_v(2, 0x02);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0x00);
        assert_eq!(i.machine().v(0xf), 1);
        Ok(())
    }

    #[test]
    fn test_sub_reversed() -> Result<()> {
        let mut i = run(&[0x81, 0x27]);
        i.machine_mut().set_v(1, 0x03);
        i.machine_mut().set_v(2, 0x01);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0xfe);
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_shifts() -> Result<()> {
        let mut i = run(&[0x81, 0x06, 0x82, 0x0e]);
        i.machine_mut().set_v(1, 0x03);
        i.machine_mut().set_v(2, 0x81);
        i.cycle()?;
        assert_eq!(i.machine().v(1), 0x01);
        assert_eq!(i.machine().v(0xf), 1);
        i.cycle()?;
        assert_eq!(i.machine().v(2), 0x02);
        assert_eq!(i.machine().v(0xf), 1);
        Ok(())
    }

    #[test]
    fn test_flag_register_as_destination() -> Result<()> {
        let mut i = run(&[0x8f, 0x14]);
        i.machine_mut().set_v(0xf, 0x10);
        i.machine_mut().set_v(1, 0x20);
        i.cycle()?;
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_index_and_jumps() -> Result<()> {
        let mut i = run(&[0xa1, 0x23, 0xb3, 0x00]);
        i.machine_mut().set_v(0, 0x04);
        i.cycle()?;
        assert_eq!(i.machine().i(), 0x123);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x304);
        Ok(())
    }

    #[test]
    fn test_random_is_masked_and_seeded() -> Result<()> {
        let mut a = run(&[0xc1, 0x0f]);
        let mut b = run(&[0xc1, 0x0f]);
        a.cycle()?;
        b.cycle()?;
        assert_eq!(a.machine().v(1) & 0xf0, 0);
        assert_eq!(a.machine().v(1), b.machine().v(1));
        Ok(())
    }

    #[test]
    fn test_draw_font_glyph() -> Result<()> {
        // I = glyph for V0 (0), draw 5 rows at (0, 0)
        let mut i = run(&[0xf0, 0x29, 0xd0, 0x05]);
        i.cycle()?;
        assert_eq!(i.machine().i(), 0);
        i.cycle()?;
        let fb = i.machine().framebuffer();
        // 0xF0 0x90 0x90 0x90 0xF0
        assert!(fb.pixel(0, 0) && fb.pixel(3, 0) && !fb.pixel(4, 0));
        assert!(fb.pixel(0, 1) && !fb.pixel(1, 1) && fb.pixel(3, 1));
        assert!(fb.draw_pending());
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_draw_twice_collides_and_restores() -> Result<()> {
        let mut i = run(&[0xd1, 0x21, 0xd1, 0x21]);
        let m = i.machine_mut();
        m.set_i(0x300);
        m.memory_mut().set_byte(0x300, 0b1010_0000)?;
        m.set_v(1, 10);
        m.set_v(2, 3);
        i.cycle()?;
        assert!(i.machine().framebuffer().pixel(10, 3));
        assert!(i.machine().framebuffer().pixel(12, 3));
        assert_eq!(i.machine().v(0xf), 0);
        i.cycle()?;
        assert_eq!(i.machine().v(0xf), 1);
        assert!(i.machine().framebuffer().cells().iter().all(|c| *c == 0));
        Ok(())
    }

    #[test]
    fn test_draw_wraps_onto_next_row() -> Result<()> {
        let mut i = run(&[0xd1, 0x21]);
        let m = i.machine_mut();
        m.set_i(0x300);
        m.memory_mut().set_byte(0x300, 0b1100_0000)?;
        m.set_v(1, 63);
        i.cycle()?;
        let fb = i.machine().framebuffer();
        assert!(fb.pixel(63, 0));
        assert!(fb.pixel(0, 1));
        Ok(())
    }

    #[test]
    fn test_draw_off_the_bottom_is_dropped() -> Result<()> {
        let mut i = run(&[0xd1, 0x22]);
        let m = i.machine_mut();
        m.set_i(0x300);
        m.memory_mut().write(&[0xff, 0xff], 0x300)?;
        m.set_v(1, 0);
        m.set_v(2, 31);
        i.cycle()?;
        let fb = i.machine().framebuffer();
        assert_eq!(fb.lit().count(), 8);
        assert_eq!(i.machine().pc(), 0x202);
        Ok(())
    }

    #[test]
    fn test_draw_zero_rows() -> Result<()> {
        // I = 0 after power on
        let mut i = run(&[0xd0, 0x00]);
        i.machine_mut().set_v(0xf, 1);
        i.cycle()?;
        assert_eq!(i.machine().v(0xf), 0);
        assert_eq!(i.machine().pc(), 0x202);
        assert_eq!(i.machine().framebuffer().lit().count(), 0);
        assert!(i.machine().framebuffer().draw_pending());
        Ok(())
    }

    #[test]
    fn test_draw_sprite_past_ram() {
        let mut i = run(&[0xd0, 0x02]);
        i.machine_mut().set_i(0x0fff);
        assert!(matches!(i.cycle(), Err(Chip8Error::OutOfBounds { .. })));
        assert!(!i.machine().framebuffer().draw_pending());
        assert_eq!(i.machine().pc(), 0x200);
    }

    #[test]
    fn test_skip_on_keys() -> Result<()> {
        let mut i = run(&[0xe1, 0x9e, 0x00, 0x00, 0xe1, 0xa1]);
        i.machine_mut().set_v(1, 0xa);
        i.set_key(0xa, true)?;
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x204);
        i.cycle()?;
        assert_eq!(i.machine().pc(), 0x206);
        Ok(())
    }

    #[test]
    fn test_skip_on_bad_key() {
        let mut i = run(&[0xe1, 0x9e]);
        i.machine_mut().set_v(1, 0x10);
        assert!(matches!(i.cycle(), Err(Chip8Error::InvalidKey { key: 0x10 })));
        assert_eq!(i.machine().pc(), 0x200);
    }

    #[test]
    fn test_wait_key() -> Result<()> {
        let mut i = run(&[0xf3, 0x0a]);
        assert_eq!(i.cycle()?, CycleState::AwaitingKey);
        assert_eq!(i.cycle()?, CycleState::AwaitingKey);
        assert_eq!(i.machine().pc(), 0x200);
        assert!(i.machine().awaiting_key());

        // timers keep running while parked
        i.machine_mut().timers_mut().delay = 2;
        i.tick_timers();
        assert_eq!(i.machine().timers().delay, 1);

        i.set_key(0x4, true)?;
        i.set_key(0x9, true)?;
        assert_eq!(i.cycle()?, CycleState::Executed(WaitKey { x: 3 }));
        assert_eq!(i.machine().v(3), 0x9);
        assert_eq!(i.machine().pc(), 0x202);
        assert!(!i.machine().awaiting_key());
        Ok(())
    }

    #[test]
    fn test_wait_key_already_held() -> Result<()> {
        let mut i = run(&[0xf0, 0x0a]);
        i.set_key(0x1, true)?;
        assert_eq!(i.cycle()?, CycleState::Executed(WaitKey { x: 0 }));
        assert_eq!(i.machine().v(0), 1);
        assert_eq!(i.machine().pc(), 0x202);
        Ok(())
    }

    #[test]
    fn test_timers_registers() -> Result<()> {
        let mut i = run(&[0xf1, 0x15, 0xf1, 0x18, 0xf2, 0x07]);
        i.machine_mut().set_v(1, 3);
        i.cycle()?;
        i.cycle()?;
        assert!(i.sound_active());
        assert_eq!(i.tick_timers(), None);
        i.cycle()?;
        assert_eq!(i.machine().v(2), 2);
        assert_eq!(i.tick_timers(), None);
        assert_eq!(i.tick_timers(), Some(TimerEvent::SoundStopped));
        assert!(!i.sound_active());
        Ok(())
    }

    #[test]
    fn test_cycle_does_not_tick_timers() -> Result<()> {
        let mut i = run(&[0x12, 0x00]);
        i.machine_mut().timers_mut().delay = 5;
        for _ in 0..10 {
            i.cycle()?;
        }
        assert_eq!(i.machine().timers().delay, 5);
        Ok(())
    }

    #[test]
    fn test_add_index_wraps() -> Result<()> {
        let mut i = run(&[0xf1, 0x1e]);
        i.machine_mut().set_i(0xffff);
        i.machine_mut().set_v(1, 2);
        i.cycle()?;
        assert_eq!(i.machine().i(), 0x0001);
        assert_eq!(i.machine().v(0xf), 0);
        Ok(())
    }

    #[test]
    fn test_bcd() -> Result<()> {
        let mut i = run(&[0xf0, 0x33]);
        i.machine_mut().set_v(0, 150);
        i.machine_mut().set_i(0x300);
        i.cycle()?;
        assert_eq!(i.machine().memory().get_ro_slice(0x300, 3)?, &[1, 5, 0]);
        Ok(())
    }

    #[test]
    fn test_bcd_past_ram_writes_nothing() {
        let mut i = run(&[0xf0, 0x33]);
        i.machine_mut().set_v(0, 255);
        i.machine_mut().set_i(0x0ffe);
        assert!(matches!(i.cycle(), Err(Chip8Error::OutOfBounds { .. })));
        assert_eq!(i.machine().memory().as_slice()[0xffe..], [0, 0]);
    }

    #[test]
    fn test_store_and_load_regs() -> Result<()> {
        let mut i = run(&[0xf2, 0x55, 0x63, 0x00, 0x60, 0x00, 0xf2, 0x65]);
        for r in 0..4 {
            i.machine_mut().set_v(r, r as u8 + 1);
        }
        i.machine_mut().set_i(0x400);
        i.cycle()?;
        assert_eq!(i.machine().memory().get_ro_slice(0x400, 4)?, &[1, 2, 3, 0]);
        i.cycle()?;
        i.cycle()?;
        i.cycle()?;
        assert_eq!(&i.machine().registers()[..4], &[1, 2, 3, 0]);
        assert_eq!(i.machine().i(), 0x400);
        Ok(())
    }

    #[test]
    fn test_load_regs_past_ram_leaves_registers() -> Result<()> {
        // V0..V2 from 0xffe..=0x1000
        let mut i = run(&[0xf2, 0x65]);
        i.machine_mut().memory_mut().write(&[0xaa, 0xbb], 0x0ffe)?;
        for r in 0..3 {
            i.machine_mut().set_v(r, 7);
        }
        i.machine_mut().set_i(0x0ffe);
        assert!(matches!(
            i.cycle(),
            Err(Chip8Error::OutOfBounds { addr: 0x1000 })
        ));
        assert_eq!(&i.machine().registers()[..3], &[7, 7, 7]);
        assert_eq!(i.machine().i(), 0x0ffe);
        assert_eq!(i.machine().pc(), 0x200);
        Ok(())
    }

    #[test]
    fn test_unknown_opcode_stops() {
        let mut i = run(&[0x80, 0x0f]);
        assert!(matches!(
            i.cycle(),
            Err(Chip8Error::UnknownOpcode {
                class: 0x8,
                opcode: 0x800f
            })
        ));
        assert_eq!(i.machine().pc(), 0x200);
    }

    #[test]
    fn test_fetch_past_ram() {
        let mut i = run(&[]);
        i.machine_mut().set_pc(0x0fff);
        assert!(matches!(i.cycle(), Err(Chip8Error::OutOfBounds { .. })));
    }
}

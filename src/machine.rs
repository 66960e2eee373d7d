use crate::error::{Chip8Error, Result};
use crate::framebuffer::Framebuffer;
use crate::keypad::Keypad;
use crate::memory::{Chip8MemoryMap, CHIP8_PROGRAM_ADDR};
use crate::timer::Timers;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
/// VF doubles as the carry/borrow/collision flag
pub const FLAG: usize = 0xf;

/// All mutable interpreter state. Only the interpreter writes to it while a
/// cycle is running; the host reads the screen and timers and writes keys in
/// between.
pub struct Machine {
    pub(crate) memory: Chip8MemoryMap,
    pub(crate) v: [u8; REGISTER_COUNT],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize,
    pub(crate) timers: Timers,
    pub(crate) keypad: Keypad,
    pub(crate) framebuffer: Framebuffer,
    /// register waiting on Fx0A, if any
    pub(crate) key_wait: Option<u8>,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            memory: Chip8MemoryMap::new(),
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            timers: Timers::new(),
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
            key_wait: None,
        }
    }

    /// back to power-on state, font loaded, no program
    pub fn reset(&mut self) {
        self.memory.reset();
        self.v = [0; REGISTER_COUNT];
        self.i = 0;
        self.pc = CHIP8_PROGRAM_ADDR;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.timers = Timers::new();
        self.keypad.clear();
        self.framebuffer.reset();
        self.key_wait = None;
    }

    pub(crate) fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Chip8Error::StackOverflow { pc: self.pc })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// write a result register then the flag, so that VF ends up holding the
    /// flag when x is 0xf
    pub(crate) fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.v[x as usize] = value;
        self.v[FLAG] = flag as u8;
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Chip8MemoryMap {
        &mut self.memory
    }

    /// V0..VF
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// only the low nibble of reg is used, as in an opcode's x/y field
    pub fn v(&self, reg: usize) -> u8 {
        self.v[reg & 0xf]
    }

    pub fn set_v(&mut self, reg: usize, value: u8) {
        self.v[reg & 0xf] = value;
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// the live part of the call stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn awaiting_key(&self) -> bool {
        self.key_wait.is_some()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

use crate::error::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

/// State of the 16 hex keys, written by the host between cycles and sampled
/// by the interpreter. No repeat or debounce.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: u8, pressed: bool) -> Result<()> {
        let k = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey { key })?;
        *k = pressed;
        Ok(())
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        self.set(key, true)
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        self.set(key, false)
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(Chip8Error::InvalidKey { key })
    }

    /// key index for a key-wait; when several are held the highest wins
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().rposition(|k| *k).map(|k| k as u8)
    }

    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.keys
    }
}

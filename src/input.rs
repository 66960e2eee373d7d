use crate::keypad::{Keypad, KEY_COUNT};
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// left-hand side of a qwerty keyboard, laid out like the COSMAC VIP keypad
///   1 2 3 C      1 2 3 4
///   4 5 6 D  <-  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// terminals only tell us about presses, so a key counts as held for this
/// many polls (one poll per 60Hz frame) after its last press or repeat
pub const KEY_HOLD_FRAMES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Continue,
    /// the user wants out
    Quit,
}

/// reads keypresses into the keypad; called by the host between cycles
pub trait Input {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputEvent, io::Error>;
}

/// keyboard input from the terminal, using crossterm in raw mode
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: [u8; KEY_COUNT],
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: [0; KEY_COUNT],
        })
    }

    /// drain pending terminal events without blocking
    fn read_events(&mut self) -> Result<InputEvent, io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => return Ok(InputEvent::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(InputEvent::Quit)
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => self.held[*mapped_key as usize] = KEY_HOLD_FRAMES,
                        None => warn!("can't map {:?} to a COSMAC key", key),
                    },
                    _ => warn!("unknown key event received"),
                },
                Event::Resize(..) => {}
                _ => warn!("unknown event received"),
            }
        }
        Ok(InputEvent::Continue)
    }

    /// count every held key down one frame and copy the result to the keypad
    fn age_keys(&mut self, keypad: &mut Keypad) {
        for (key, frames) in self.held.iter_mut().enumerate() {
            // the index is always < 16
            let _ = keypad.set(key as u8, *frames > 0);
            *frames = frames.saturating_sub(1);
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputEvent, io::Error> {
        let event = self.read_events()?;
        self.age_keys(keypad);
        Ok(event)
    }
}

/// scripted Input for testing: each poll holds exactly the keys in the next
/// frame of the script; once the script runs out it asks to quit
pub struct DummyInput {
    frames: VecDeque<Vec<u8>>,
}

impl DummyInput {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        DummyInput {
            frames: VecDeque::from(frames),
        }
    }
}

impl Input for DummyInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputEvent, io::Error> {
        match self.frames.pop_front() {
            Some(keys) => {
                keypad.clear();
                for key in keys {
                    keypad
                        .press(key)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                }
                Ok(InputEvent::Continue)
            }
            None => Ok(InputEvent::Quit),
        }
    }
}

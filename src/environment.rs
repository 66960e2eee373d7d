//! # environment
//!
//! The host side of things: owns the interpreter and drives it against a
//! display and an input device.
//!
//! main loop, one pass per 60Hz frame
//!  |-- input.poll()              keypad only changes between cycles
//!  |-- interpreter.cycle() x N   N = ips / 60
//!  |-- interpreter.tick_timers() once, so timers run at 60Hz regardless of N
//!  |-- display.draw()            only if the framebuffer changed
//!  `-- sleep until the next frame
//!
//! Quitting happens between cycles so there's nothing to unwind.

use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::input::{Input, InputEvent};
use crate::interpreter::Chip8Interpreter;
use crate::timer::TIMER_HZ;
use log::{debug, info};
use spin_sleep::LoopHelper;
use std::fs::File;

/// why the main loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Quit,
    CycleLimit,
}

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    config: Config,
    cycles: u64,
}

impl<'a> Environment<'a> {
    pub fn new(config: Config, display: &'a mut dyn Display, input: &'a mut dyn Input) -> Self {
        let interpreter = match config.seed {
            Some(seed) => Chip8Interpreter::with_seed(seed),
            None => Chip8Interpreter::new(),
        };
        Environment {
            interpreter,
            display,
            input,
            config,
            cycles: 0,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Chip8Interpreter {
        &mut self.interpreter
    }

    /// instructions executed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// load the ROM named in the config
    pub fn load_rom(&mut self) -> Result<()> {
        info!("loading {}", self.config.rom.display());
        let mut f = File::open(&self.config.rom)?;
        self.interpreter.load_from(&mut f)
    }

    /// run frames at 60Hz until the user quits, the cycle limit is hit, or
    /// the interpreter fails
    pub fn main_loop(&mut self) -> Result<Halt> {
        let mut loop_helper = LoopHelper::builder()
            .report_interval_s(1.0)
            .build_with_target_rate(TIMER_HZ as f64);

        loop {
            loop_helper.loop_start();
            match self.frame() {
                Ok(Some(halt)) => {
                    info!("stopped after {} cycles: {:?}", self.cycles, halt);
                    return Ok(halt);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("failed after {} cycles: {}", self.cycles, e);
                    return Err(e);
                }
            }
            if let Some(fps) = loop_helper.report_rate() {
                debug!("{:.1} frames/s, {} cycles", fps, self.cycles);
            }
            loop_helper.loop_sleep();
        }
    }

    /// one 60Hz frame's worth of work, without the sleep
    pub fn frame(&mut self) -> Result<Option<Halt>> {
        let machine = self.interpreter.machine_mut();
        if self.input.poll(machine.keypad_mut())? == InputEvent::Quit {
            return Ok(Some(Halt::Quit));
        }

        for _ in 0..self.config.cycles_per_frame() {
            if self.config.max_cycles.map_or(false, |max| self.cycles >= max) {
                return Ok(Some(Halt::CycleLimit));
            }
            self.interpreter.cycle()?;
            self.cycles += 1;
        }
        self.interpreter.tick_timers();

        let sound_active = self.interpreter.sound_active();
        let fb = self.interpreter.machine_mut().framebuffer_mut();
        if fb.take_draw_pending() {
            self.display.draw(fb, sound_active)?;
        }
        Ok(None)
    }
}

use crate::timer::TIMER_HZ;
use std::path::PathBuf;

/// instructions per second when nobody says otherwise
pub const DEFAULT_IPS: u32 = 700;

/// How a run should go. Built by the binary from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rom: PathBuf,
    /// instruction rate; timers run at 60Hz whatever this is
    pub ips: u32,
    /// fixes the Cxnn random stream
    pub seed: Option<u64>,
    /// stop after this many instructions
    pub max_cycles: Option<u64>,
}

impl Config {
    pub fn new(rom: impl Into<PathBuf>) -> Self {
        Config {
            rom: rom.into(),
            ips: DEFAULT_IPS,
            seed: None,
            max_cycles: None,
        }
    }

    /// instructions to run between two timer ticks, at least one
    pub fn cycles_per_frame(&self) -> u32 {
        ((self.ips + TIMER_HZ / 2) / TIMER_HZ).max(1)
    }
}

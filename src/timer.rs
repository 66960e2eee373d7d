/// rate at which the host should call tick(), independent of instruction rate
pub const TIMER_HZ: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// the sound timer just ran down from 1 to 0
    SoundStopped,
}

/// The delay and sound timers. Both count down to zero and rest there.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.delay = self.delay.saturating_sub(1);
        match self.sound {
            0 => None,
            1 => {
                self.sound = 0;
                Some(TimerEvent::SoundStopped)
            }
            _ => {
                self.sound -= 1;
                None
            }
        }
    }

    /// the host should be beeping
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

use serde::{Deserialize, Serialize};

pub const MAX_PHASE_TIMER_SECONDS: u32 = 180;

/// Table-level toggles read by the engine at match start.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseRules {
    pub allow_skip_werewolf_kill: bool,
    pub allow_skip_day_voting: bool,
    pub allow_skip_hunter_revenge: bool,
    /// Zero disables the timer.
    pub phase_timer_seconds: u32,
    pub doctor_can_save_himself: bool,
    pub doctor_can_save_same_person_twice: bool,
}

impl HouseRules {
    pub fn sanitized(mut self) -> Self {
        self.phase_timer_seconds = self.phase_timer_seconds.min(MAX_PHASE_TIMER_SECONDS);
        self
    }

    pub fn timer_enabled(&self) -> bool {
        self.phase_timer_seconds > 0
    }
}

/// Lifecycle of the shutdown coordinator. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPhase {
    #[default]
    Running,
    Cleaning,
    Reported,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: ShutdownPhase,
    interrupts: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShutdownPhase {
        self.phase
    }

    /// Number of interrupts seen so far, including ignored repeats.
    pub fn interrupts_received(&self) -> u32 {
        self.interrupts
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == ShutdownPhase::Terminated
    }

    pub(crate) fn set_phase(&mut self, phase: ShutdownPhase) {
        self.phase = phase;
    }

    pub(crate) fn count_interrupt(&mut self) {
        self.interrupts = self.interrupts.saturating_add(1);
    }
}

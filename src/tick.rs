/// How a scheduler run ended. `turns` counts completed actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The cancellation token fired between two turns.
    Stopped { turns: u64 },
    /// Nobody was left in the queue.
    Idle { turns: u64 },
    /// The requested number of turns was played.
    Exhausted { turns: u64 },
}

impl RunOutcome {
    pub fn turns(&self) -> u64 {
        match *self {
            RunOutcome::Stopped { turns } | RunOutcome::Idle { turns } | RunOutcome::Exhausted { turns } => turns,
        }
    }
}

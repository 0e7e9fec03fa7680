//! Process-wide pause gate.
//!
//! One flag, one owner. Every component that advances time-dependent state
//! consults this controller instead of keeping its own paused copy. The
//! session layer wires the pause input to an autosave; this type only owns
//! the flag itself.

/// Gates time progression for the whole session.
#[derive(Debug, Default)]
pub struct PauseController {
    paused: bool,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Halt time accrual. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("paused");
        }
    }

    /// Resume time accrual. Idempotent; also used to force a known-good
    /// running state after a restore or a new game.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("resumed");
        }
    }

    /// Flip the flag; returns true if now paused.
    pub fn toggle(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        assert!(!PauseController::new().is_paused());
    }

    #[test]
    fn test_toggle_flips() {
        let mut pause = PauseController::new();
        assert!(pause.toggle());
        assert!(pause.is_paused());
        assert!(!pause.toggle());
        assert!(!pause.is_paused());
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut pause = PauseController::new();
        pause.pause();
        pause.pause();
        assert!(pause.is_paused());
        pause.resume();
        pause.resume();
        assert!(!pause.is_paused());
    }
}

//! Scene-transition coordinator.
//!
//! Restoring a save spans an asynchronous scene load: the old object graph is
//! torn down, the new scene's objects initialize and register themselves, and
//! only then may the snapshot be applied. The coordinator sequences this as a
//! small state machine. The load-completed signal does not mean every new
//! object has finished initializing, so restoration is armed for the *next*
//! tick rather than run immediately; one full tick is enough for every
//! initialization callback scheduled by the load to have run.

use crate::pause::PauseController;
use crate::registry::StateRegistry;

/// Where the coordinator is in the resume sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No restore in flight; scene loads are ordinary scene changes.
    Idle,
    /// A resume was requested; waiting for the scene load to complete.
    ResumePending,
    /// Load completed; waiting one tick for new objects to register.
    SettlingAfterLoad,
}

/// Sequences restore-after-scene-load. At most one resume is in flight.
pub struct TransitionCoordinator {
    phase: TransitionPhase,
    /// Ticks to let pass before the restore fires.
    settle_ticks: u32,
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionCoordinator {
    pub fn new() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            settle_ticks: 0,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Arm a resume. Succeeds only from `Idle` and only if a save exists;
    /// anything else is a no-op returning false.
    pub fn request_resume(&mut self, registry: &StateRegistry) -> bool {
        if self.phase != TransitionPhase::Idle {
            log::debug!("resume already in flight, ignoring request");
            return false;
        }
        if !registry.has_save() {
            log::debug!("resume requested with no save present, ignoring");
            return false;
        }
        self.phase = TransitionPhase::ResumePending;
        log::info!("resume pending for scene {:?}", registry.saved_scene_name());
        true
    }

    /// Scene-load-completed signal from the scene loader. Advances only from
    /// `ResumePending`; while `Idle` this is a normal, non-restoring scene
    /// change.
    pub fn scene_loaded(&mut self) {
        if self.phase == TransitionPhase::ResumePending {
            self.phase = TransitionPhase::SettlingAfterLoad;
            self.settle_ticks = 1;
            log::debug!("scene loaded, settling before restore");
        }
    }

    /// Per-tick check. Once the settle delay has elapsed, applies the
    /// snapshot through the registry, force-clears the pause flag (a resumed
    /// game never starts frozen), and returns to `Idle`.
    pub fn tick(&mut self, registry: &StateRegistry, pause: &mut PauseController) {
        if self.phase != TransitionPhase::SettlingAfterLoad {
            return;
        }
        if self.settle_ticks > 0 {
            self.settle_ticks -= 1;
            return;
        }
        registry.restore();
        pause.resume();
        self.phase = TransitionPhase::Idle;
    }

    /// Abandon any in-flight resume. Used when a new game supersedes it.
    pub fn reset(&mut self) {
        if self.phase != TransitionPhase::Idle {
            log::info!("dropping in-flight resume");
        }
        self.phase = TransitionPhase::Idle;
        self.settle_ticks = 0;
    }
}

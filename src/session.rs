//! The session root service.
//!
//! [`GameSession`] is the one explicitly constructed object that owns the
//! registry, the transition coordinator, the pause controller, and the scene
//! router - the whole subsystem behind a single surface, passed by reference
//! to whatever needs it instead of living in process-wide statics. It drives
//! the cooperative tick and translates discrete host inputs (play, pause,
//! portal) into operations on the parts.

use std::cell::RefCell;
use std::rc::Rc;

use crate::pause::PauseController;
use crate::registry::{DEFAULT_SCENE, StateRegistry};
use crate::scene::{SceneRouter, SceneTarget};
use crate::store::SaveStore;
use crate::transition::{TransitionCoordinator, TransitionPhase};
use crate::world::{Player, Progress};

/// The live objects of the currently loaded scene. Dropped wholesale when a
/// scene unloads, which is what makes the registry's handles go stale.
pub struct SceneWorld {
    pub player: Rc<RefCell<Player>>,
    pub progress: Rc<RefCell<Progress>>,
}

impl SceneWorld {
    fn spawn(registry: &mut StateRegistry) -> Self {
        Self {
            player: Player::spawn(registry),
            progress: Progress::spawn(registry),
        }
    }
}

/// Owns and wires the whole save/restore subsystem.
pub struct GameSession {
    registry: StateRegistry,
    coordinator: TransitionCoordinator,
    pause: PauseController,
    router: SceneRouter,
    world: Option<SceneWorld>,
}

impl GameSession {
    /// Build a session over a store and a scene table. Any persisted save is
    /// loaded immediately (fail-closed); no scene is loaded yet.
    pub fn new(store: Box<dyn SaveStore>, router: SceneRouter) -> Self {
        Self {
            registry: StateRegistry::new(store),
            coordinator: TransitionCoordinator::new(),
            pause: PauseController::new(),
            router,
            world: None,
        }
    }

    /// One cooperative tick: advance the pending scene load, run the settle
    /// check, accrue play time. `dt` is the tick's wall-clock duration in
    /// seconds.
    pub fn tick(&mut self, dt: f32) {
        if let Some(loaded) = self.router.tick() {
            // Scene content initializes and registers now; the coordinator
            // still waits a full tick before reading those registrations.
            self.world = Some(SceneWorld::spawn(&mut self.registry));
            log::info!("entered scene {:?}", loaded.name);
            self.coordinator.scene_loaded();
        }

        self.coordinator.tick(&self.registry, &mut self.pause);

        if let Some(world) = &self.world {
            world.progress.borrow_mut().advance(dt, &self.pause);
        }
    }

    /// The menu Play action: resume from the save if one exists, otherwise
    /// start a fresh run in the default scene.
    pub fn play(&mut self) {
        if self.registry.has_save() {
            self.coordinator.request_resume(&self.registry);
            let scene = self.registry.saved_scene_name().to_string();
            self.load_scene(SceneTarget::Name(scene));
        } else {
            self.start_new_game();
            self.load_scene(SceneTarget::Name(DEFAULT_SCENE.to_string()));
        }
    }

    /// Clear the save and all in-flight restore state. Supersedes any
    /// pending resume.
    pub fn start_new_game(&mut self) {
        self.registry.start_new_game();
        self.coordinator.reset();
        self.pause.resume();
    }

    /// Arm a resume without loading a scene (the host may drive the load
    /// itself). No-op unless a save exists and nothing is already pending.
    pub fn request_resume(&mut self) -> bool {
        self.coordinator.request_resume(&self.registry)
    }

    /// Pause input. Pausing always autosaves; a second press resumes.
    pub fn toggle_pause(&mut self) {
        if self.pause.is_paused() {
            self.pause.resume();
        } else {
            self.pause.pause();
            self.save();
        }
    }

    /// Checkpoint save in the current scene. A store failure abandons the
    /// save with a diagnostic; it never propagates.
    pub fn save(&mut self) {
        let scene = self.router.current_name().to_string();
        if let Err(e) = self.registry.save(&scene) {
            log::warn!("autosave abandoned: {e}");
        }
    }

    /// Portal interaction: load the next scene in build order, wrapping.
    pub fn enter_portal(&mut self) {
        self.unload_world();
        self.router.load_next();
    }

    /// Request a scene load, tearing the current world down first.
    pub fn load_scene(&mut self, target: SceneTarget) {
        self.unload_world();
        self.router.load(target);
    }

    /// Tear down the current scene's objects and invalidate their
    /// registrations so a restore can never touch a disposed object.
    fn unload_world(&mut self) {
        self.registry.invalidate_registrations();
        self.world = None;
    }

    pub fn has_save(&self) -> bool {
        self.registry.has_save()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn transition_phase(&self) -> TransitionPhase {
        self.coordinator.phase()
    }

    pub fn current_scene(&self) -> &str {
        self.router.current_name()
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StateRegistry {
        &mut self.registry
    }

    pub fn world(&self) -> Option<&SceneWorld> {
        self.world.as_ref()
    }
}

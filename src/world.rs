//! Live objects that own savable state.
//!
//! [`Player`] and [`Progress`] are the concrete implementations of the two
//! registry roles. They are created per scene, register themselves with the
//! registry during their own initialization, and are dropped wholesale when
//! the scene is torn down - the registry only ever holds weak handles to
//! them.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::pause::PauseController;
use crate::registry::{PlayerAvatar, ProgressOwner, StateRegistry};

/// The player's spatial state.
#[derive(Debug)]
pub struct Player {
    position: Vec3,
    rotation: Quat,
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a player and register it as the active player role.
    pub fn spawn(registry: &mut StateRegistry) -> Rc<RefCell<Player>> {
        let player = Rc::new(RefCell::new(Player::new()));
        registry.register_player_rc(&player);
        player
    }

    /// Translate by a world-space delta.
    pub fn walk(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Face a yaw angle (radians around the world up axis).
    pub fn face(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAvatar for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }
}

/// Score and accumulated play time.
#[derive(Debug, Default)]
pub struct Progress {
    score: u64,
    game_time: f32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a progress tracker and register it as the score/time role.
    pub fn spawn(registry: &mut StateRegistry) -> Rc<RefCell<Progress>> {
        let progress = Rc::new(RefCell::new(Progress::new()));
        registry.register_progress_owner_rc(&progress);
        progress
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Accrue play time. The pause controller is the single source of truth
    /// for whether time advances; no paused copy is kept here.
    pub fn advance(&mut self, dt: f32, pause: &PauseController) {
        if !pause.is_paused() {
            self.game_time += dt;
        }
    }
}

impl ProgressOwner for Progress {
    fn score(&self) -> u64 {
        self.score
    }

    fn elapsed_time(&self) -> f32 {
        self.game_time
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    fn set_elapsed_time(&mut self, seconds: f32) {
        self.game_time = seconds;
    }
}

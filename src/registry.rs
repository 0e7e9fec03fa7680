//! The state registry: current snapshot plus live-object registrations.
//!
//! Live objects are created and destroyed by scene loads; the registry
//! outlives them all. Each object that can supply or accept saved state
//! pushes a weak handle in during its own initialization (registration is
//! pull-free), and the registry simply overwrites whatever handle it held
//! before. Capture and restore upgrade the handles on the spot and silently
//! skip any role that is unregistered or already dead.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Quat, Vec3};

use crate::codec;
use crate::error::SaveError;
use crate::snapshot::Snapshot;
use crate::store::{SAVE_KEY, SaveStore};

/// Scene to fall back to when no save exists.
pub const DEFAULT_SCENE: &str = "GameScene";

/// A live object owning the player's spatial state.
pub trait PlayerAvatar {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_transform(&mut self, position: Vec3, rotation: Quat);
}

/// A live object owning score and elapsed play time.
pub trait ProgressOwner {
    fn score(&self) -> u64;
    fn elapsed_time(&self) -> f32;
    fn set_score(&mut self, score: u64);
    fn set_elapsed_time(&mut self, seconds: f32);
}

pub type PlayerHandle = Weak<RefCell<dyn PlayerAvatar>>;
pub type ProgressHandle = Weak<RefCell<dyn ProgressOwner>>;

/// Holds the current snapshot and weak back-references to whichever live
/// objects have registered for the two savable roles.
pub struct StateRegistry {
    store: Box<dyn SaveStore>,
    snapshot: Option<Snapshot>,
    player: Option<PlayerHandle>,
    progress: Option<ProgressHandle>,
}

impl StateRegistry {
    /// Open the registry over a store, loading any existing save.
    ///
    /// Loading fails closed: a corrupt blob or an unreachable store is logged
    /// and treated as "no save exists" so the application can always start.
    pub fn new(store: Box<dyn SaveStore>) -> Self {
        let snapshot = match store.get(SAVE_KEY) {
            Ok(Some(raw)) => match codec::decode(&raw) {
                Ok(snap) => {
                    log::info!("loaded save for scene {:?}", snap.scene_name);
                    Some(snap)
                }
                Err(e) => {
                    log::warn!("discarding unreadable save: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("save store unreadable at startup: {e}");
                None
            }
        };
        Self {
            store,
            snapshot,
            player: None,
            progress: None,
        }
    }

    /// Register the player role. Idempotent, last write wins.
    pub fn register_player(&mut self, handle: PlayerHandle) {
        self.player = Some(handle);
    }

    /// Register the score/time role. Idempotent, last write wins.
    pub fn register_progress_owner(&mut self, handle: ProgressHandle) {
        self.progress = Some(handle);
    }

    /// Convenience registration straight from an `Rc`.
    pub fn register_player_rc<T: PlayerAvatar + 'static>(&mut self, player: &Rc<RefCell<T>>) {
        let handle: Rc<RefCell<dyn PlayerAvatar>> = player.clone();
        self.register_player(Rc::downgrade(&handle));
    }

    /// Convenience registration straight from an `Rc`.
    pub fn register_progress_owner_rc<T: ProgressOwner + 'static>(
        &mut self,
        progress: &Rc<RefCell<T>>,
    ) {
        let handle: Rc<RefCell<dyn ProgressOwner>> = progress.clone();
        self.register_progress_owner(Rc::downgrade(&handle));
    }

    /// Drop all registrations. Called when a scene is torn down so a restore
    /// can never write into a disposed object.
    pub fn invalidate_registrations(&mut self) {
        self.player = None;
        self.progress = None;
    }

    /// True iff a snapshot with a non-empty scene name is in memory.
    pub fn has_save(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| !s.scene_name.is_empty())
    }

    /// Scene name of the current save, or [`DEFAULT_SCENE`] if none exists.
    pub fn saved_scene_name(&self) -> &str {
        match &self.snapshot {
            Some(snap) if !snap.scene_name.is_empty() => &snap.scene_name,
            _ => DEFAULT_SCENE,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Mutable access to the snapshot's auxiliary state, creating the
    /// snapshot if this is the first touch. Extras set here ride along with
    /// the next `save`.
    pub fn snapshot_mut(&mut self) -> &mut Snapshot {
        self.snapshot.get_or_insert_with(Snapshot::default)
    }

    /// Capture state from every registered live role and persist it.
    ///
    /// Partial capture is expected: a role that never registered, or whose
    /// object has since been destroyed, is skipped and the snapshot keeps its
    /// previous value for those fields. The snapshot is mutated in place and
    /// then written to the store under [`SAVE_KEY`].
    pub fn save(&mut self, scene_name: &str) -> Result<(), SaveError> {
        let snap = self.snapshot.get_or_insert_with(Snapshot::default);
        snap.scene_name = scene_name.to_string();

        if let Some(player) = self.player.as_ref().and_then(Weak::upgrade) {
            let player = player.borrow();
            snap.player_position = player.position();
            snap.player_rotation = player.rotation();
        } else {
            log::debug!("no player registered, keeping previous spatial state");
        }

        if let Some(progress) = self.progress.as_ref().and_then(Weak::upgrade) {
            let progress = progress.borrow();
            snap.score = progress.score();
            snap.elapsed_time = progress.elapsed_time();
        } else {
            log::debug!("no progress owner registered, keeping previous score/time");
        }

        let encoded = codec::encode(snap)?;
        self.store.set(SAVE_KEY, &encoded)?;
        self.store.flush()?;
        log::info!("game state saved in scene {scene_name:?}");
        Ok(())
    }

    /// Apply the current snapshot to every registered live role. Roles with
    /// no live object are skipped; no snapshot means nothing happens.
    pub fn restore(&self) {
        let Some(snap) = &self.snapshot else {
            return;
        };

        if let Some(player) = self.player.as_ref().and_then(Weak::upgrade) {
            player
                .borrow_mut()
                .set_transform(snap.player_position, snap.player_rotation);
        } else {
            log::warn!("restore: no live player to receive position");
        }

        if let Some(progress) = self.progress.as_ref().and_then(Weak::upgrade) {
            let mut progress = progress.borrow_mut();
            progress.set_score(snap.score);
            progress.set_elapsed_time(snap.elapsed_time);
        } else {
            log::warn!("restore: no live progress owner to receive score/time");
        }

        log::info!("game state restored");
    }

    /// Drop the in-memory snapshot and delete the persisted entry. A store
    /// failure here is logged and ignored; the in-memory state is cleared
    /// regardless.
    pub fn start_new_game(&mut self) {
        self.snapshot = None;
        if let Err(e) = self
            .store
            .delete(SAVE_KEY)
            .and_then(|()| self.store.flush())
        {
            log::warn!("could not clear persisted save: {e}");
        } else {
            log::info!("save data cleared");
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &dyn SaveStore {
        &*self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::world::{Player, Progress};
    use std::io;

    fn registry() -> StateRegistry {
        StateRegistry::new(Box::new(MemoryStore::new()))
    }

    /// Store whose writes and reads always fail.
    struct FailingStore;

    impl SaveStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, SaveError> {
            Err(io::Error::other("backend down").into())
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), SaveError> {
            Err(io::Error::other("backend down").into())
        }
        fn delete(&mut self, _key: &str) -> Result<(), SaveError> {
            Err(io::Error::other("backend down").into())
        }
    }

    #[test]
    fn test_fresh_registry_has_no_save() {
        let reg = registry();
        assert!(!reg.has_save());
        assert_eq!(reg.saved_scene_name(), DEFAULT_SCENE);
    }

    #[test]
    fn test_corrupt_save_is_treated_as_no_save() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{{ not valid json").unwrap();
        let reg = StateRegistry::new(Box::new(store));
        assert!(!reg.has_save());
    }

    #[test]
    fn test_unavailable_store_is_treated_as_no_save() {
        let reg = StateRegistry::new(Box::new(FailingStore));
        assert!(!reg.has_save());
    }

    #[test]
    fn test_save_round_trips_through_store() {
        let mut reg = registry();
        let player = Player::spawn(&mut reg);
        let progress = Progress::spawn(&mut reg);
        player
            .borrow_mut()
            .set_transform(Vec3::new(4.0, 0.0, 9.0), Quat::from_rotation_y(1.0));
        progress.borrow_mut().set_score(70);
        progress.borrow_mut().set_elapsed_time(33.5);

        reg.save("Level2").unwrap();
        assert!(reg.has_save());
        assert_eq!(reg.saved_scene_name(), "Level2");

        // A fresh registry over the same blob sees the same snapshot.
        let raw = reg.store().get(SAVE_KEY).unwrap().unwrap();
        let decoded = codec::decode(&raw).unwrap();
        assert_eq!(decoded, *reg.snapshot().unwrap());
    }

    #[test]
    fn test_registration_last_write_wins() {
        let mut reg = registry();
        let first = Player::spawn(&mut reg);
        let second = Player::spawn(&mut reg);
        first.borrow_mut().set_transform(Vec3::X, Quat::IDENTITY);
        second
            .borrow_mut()
            .set_transform(Vec3::new(0.0, 0.0, 7.0), Quat::IDENTITY);

        reg.save("GameScene").unwrap();
        assert_eq!(
            reg.snapshot().unwrap().player_position,
            Vec3::new(0.0, 0.0, 7.0)
        );
    }

    #[test]
    fn test_partial_capture_skips_missing_roles() {
        let mut reg = registry();
        let player = Player::spawn(&mut reg);
        player
            .borrow_mut()
            .set_transform(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.5));

        // No progress owner registered: save succeeds, score/time stay default.
        reg.save("GameScene").unwrap();
        let snap = reg.snapshot().unwrap();
        assert_eq!(snap.player_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snap.score, 0);
        assert_eq!(snap.elapsed_time, 0.0);
    }

    #[test]
    fn test_capture_skips_dead_handles() {
        let mut reg = registry();
        let player = Player::spawn(&mut reg);
        player
            .borrow_mut()
            .set_transform(Vec3::new(5.0, 0.0, 5.0), Quat::IDENTITY);
        reg.save("GameScene").unwrap();

        // Scene teardown destroys the object; the stale handle is skipped and
        // the previously captured position survives.
        drop(player);
        reg.save("GameScene").unwrap();
        assert_eq!(
            reg.snapshot().unwrap().player_position,
            Vec3::new(5.0, 0.0, 5.0)
        );
    }

    #[test]
    fn test_restore_applies_to_live_objects() {
        let mut reg = registry();
        let player = Player::spawn(&mut reg);
        let progress = Progress::spawn(&mut reg);
        player
            .borrow_mut()
            .set_transform(Vec3::new(8.0, 1.0, -2.0), Quat::from_rotation_y(2.0));
        progress.borrow_mut().set_score(120);
        progress.borrow_mut().set_elapsed_time(45.0);
        reg.save("Level2").unwrap();

        // New scene: fresh objects register over the old handles.
        reg.invalidate_registrations();
        let player2 = Player::spawn(&mut reg);
        let progress2 = Progress::spawn(&mut reg);
        assert_eq!(player2.borrow().position(), Vec3::ZERO);

        reg.restore();
        assert_eq!(player2.borrow().position(), Vec3::new(8.0, 1.0, -2.0));
        assert_eq!(progress2.borrow().score(), 120);
        assert_eq!(progress2.borrow().elapsed_time(), 45.0);
    }

    #[test]
    fn test_restore_without_snapshot_is_noop() {
        let mut reg = registry();
        let player = Player::spawn(&mut reg);
        reg.restore();
        assert_eq!(player.borrow().position(), Vec3::ZERO);
    }

    #[test]
    fn test_start_new_game_clears_everything() {
        let mut reg = registry();
        let _player = Player::spawn(&mut reg);
        reg.save("Level2").unwrap();
        assert!(reg.has_save());
        assert!(reg.store().has(SAVE_KEY).unwrap());

        reg.start_new_game();
        assert!(!reg.has_save());
        assert!(!reg.store().has(SAVE_KEY).unwrap());
        assert_eq!(reg.saved_scene_name(), DEFAULT_SCENE);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut reg = StateRegistry::new(Box::new(FailingStore));
        let _player = Player::spawn(&mut reg);
        let err = reg.save("GameScene").unwrap_err();
        assert!(matches!(err, SaveError::Store(_)));
        // The in-memory snapshot still captured; a later save can retry.
        assert!(reg.has_save());
    }

    #[test]
    fn test_extras_ride_along_with_save() {
        let mut reg = registry();
        reg.snapshot_mut().extras.set("checkpoint", "bridge");
        reg.save("Level2").unwrap();

        let raw = reg.store().get(SAVE_KEY).unwrap().unwrap();
        let decoded = codec::decode(&raw).unwrap();
        assert_eq!(decoded.extras.get("checkpoint"), Some("bridge"));
    }
}

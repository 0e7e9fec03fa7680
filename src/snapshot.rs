//! The persisted session record.
//!
//! A [`Snapshot`] is the single unit of saved state: where the player stands,
//! how far the run has progressed, and any auxiliary keyed values a scene
//! wants carried across a save. There is exactly one current snapshot per
//! process; it is created lazily on first save and overwritten in place on
//! every save after that.

use glam::{Quat, Vec3};

/// Insertion-ordered string key/value container for auxiliary save data.
///
/// Keys are unique; setting an existing key replaces its value in place
/// without moving it. Backed by a plain vector because the persisted format
/// has no map primitive, so order must survive a round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extras {
    entries: Vec<(String, String)>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to a value. Last write wins; existing keys keep their slot.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The saved session state.
///
/// An empty `scene_name` means "no save exists"; everything else defaults to
/// a fresh run so a partial capture (some roles not yet registered) still
/// yields a usable record.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Scene the save was taken in. Empty means no save.
    pub scene_name: String,
    pub player_position: Vec3,
    pub player_rotation: Quat,
    pub score: u64,
    /// Accumulated unpaused play time in seconds.
    pub elapsed_time: f32,
    /// Open-ended keyed state (checkpoint tags, flags, ...).
    pub extras: Extras,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            scene_name: String::new(),
            player_position: Vec3::ZERO,
            player_rotation: Quat::IDENTITY,
            score: 0,
            elapsed_time: 0.0,
            extras: Extras::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_last_write_wins() {
        let mut extras = Extras::new();
        extras.set("checkpoint", "bridge");
        extras.set("difficulty", "hard");
        extras.set("checkpoint", "tower");

        assert_eq!(extras.len(), 2);
        assert_eq!(extras.get("checkpoint"), Some("tower"));
        // Rewriting a key must not move it to the back.
        let keys: Vec<&str> = extras.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["checkpoint", "difficulty"]);
    }

    #[test]
    fn test_extras_get_missing() {
        let extras = Extras::new();
        assert!(extras.is_empty());
        assert_eq!(extras.get("anything"), None);
        assert!(!extras.contains_key("anything"));
    }

    #[test]
    fn test_default_snapshot_is_empty_save() {
        let snap = Snapshot::default();
        assert!(snap.scene_name.is_empty());
        assert_eq!(snap.player_position, Vec3::ZERO);
        assert_eq!(snap.player_rotation, Quat::IDENTITY);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.elapsed_time, 0.0);
        assert!(snap.extras.is_empty());
    }
}

//! scene-session - session state persistence and scene-transition sync
//!
//! Captures a snapshot of mutable runtime state (player transform, score,
//! play time, keyed extras), persists it to a durable key-value store, and
//! restores it correctly after the live object graph has been torn down and
//! rebuilt across an asynchronous scene load.
//!
//! Core modules:
//! - `snapshot` / `codec`: the persisted record and its JSON wire form
//! - `store`: key-value storage backends (memory, file, LocalStorage)
//! - `registry`: current snapshot + weak handles to live objects
//! - `transition`: restore-after-scene-load state machine
//! - `pause`: the process-wide time gate
//! - `scene`: scene table, async loads, build-order navigation
//! - `session`: the root service wiring the parts together
//! - `world`: reference live objects for the two savable roles

pub mod codec;
pub mod error;
pub mod pause;
pub mod registry;
pub mod scene;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod transition;
pub mod world;

pub use error::SaveError;
pub use pause::PauseController;
pub use registry::{DEFAULT_SCENE, PlayerAvatar, ProgressOwner, StateRegistry};
pub use scene::{SceneLoaded, SceneRouter, SceneTarget};
pub use session::{GameSession, SceneWorld};
pub use snapshot::{Extras, Snapshot};
pub use store::{MemoryStore, SAVE_KEY, SaveStore};
pub use transition::{TransitionCoordinator, TransitionPhase};
pub use world::{Player, Progress};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;

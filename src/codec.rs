//! Snapshot wire codec.
//!
//! Pure, stateless conversion between [`Snapshot`] and its persisted JSON
//! text. The extras map is flattened into two parallel arrays on the wire
//! (the storage layer comes from a format with no map primitive), and rebuilt
//! into a proper keyed container on decode. Decode validates the parallel
//! lists instead of trusting them: mismatched lengths or duplicate keys are
//! a [`SaveError::Decode`]-class failure, which the registry treats as
//! "no save exists".

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::snapshot::{Extras, Snapshot};

/// On-disk shape of a snapshot. Extras are split into parallel key/value
/// lists; everything else maps 1:1.
#[derive(Serialize, Deserialize)]
struct SnapshotWire {
    scene_name: String,
    player_position: Vec3,
    player_rotation: Quat,
    score: u64,
    elapsed_time: f32,
    extra_keys: Vec<String>,
    extra_values: Vec<String>,
}

/// Serialize a snapshot to its persisted text form.
pub fn encode(snapshot: &Snapshot) -> Result<String, SaveError> {
    let wire = SnapshotWire {
        scene_name: snapshot.scene_name.clone(),
        player_position: snapshot.player_position,
        player_rotation: snapshot.player_rotation,
        score: snapshot.score,
        elapsed_time: snapshot.elapsed_time,
        extra_keys: snapshot.extras.iter().map(|(k, _)| k.to_string()).collect(),
        extra_values: snapshot.extras.iter().map(|(_, v)| v.to_string()).collect(),
    };
    serde_json::to_string_pretty(&wire).map_err(|e| SaveError::Encode(e.to_string()))
}

/// Parse persisted text back into a snapshot.
pub fn decode(raw: &str) -> Result<Snapshot, SaveError> {
    let wire: SnapshotWire =
        serde_json::from_str(raw).map_err(|e| SaveError::Decode(e.to_string()))?;

    if wire.extra_keys.len() != wire.extra_values.len() {
        return Err(SaveError::ExtrasMismatch {
            keys: wire.extra_keys.len(),
            values: wire.extra_values.len(),
        });
    }

    let mut extras = Extras::new();
    for (key, value) in wire.extra_keys.into_iter().zip(wire.extra_values) {
        if extras.contains_key(&key) {
            return Err(SaveError::DuplicateExtraKey(key));
        }
        extras.set(key, value);
    }

    Ok(Snapshot {
        scene_name: wire.scene_name,
        player_position: wire.player_position,
        player_rotation: wire.player_rotation,
        score: wire.score,
        elapsed_time: wire.elapsed_time,
        extras,
    })
}

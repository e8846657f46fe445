//! Opaque serialized captures of the editing surface.
//!
//! A [`Snapshot`] is an independent copy: capturing serializes the scene,
//! so later mutations of the live scene never reach back into a snapshot
//! already handed to the history log.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{SceneError, SceneV1};

/// A serialized capture of a complete [`SceneV1`] at one instant.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(String);

impl Snapshot {
    /// Capture the current state of a scene.
    pub fn capture(scene: &SceneV1) -> Result<Self, SceneError> {
        let json = serde_json::to_string(scene).map_err(SceneError::Serialize)?;
        trace!(bytes = json.len(), "captured scene snapshot");
        Ok(Snapshot(json))
    }

    /// Deserialize the captured scene. The snapshot itself is unchanged;
    /// a failure here leaves the caller free to retry or discard.
    pub fn restore(&self) -> Result<SceneV1, SceneError> {
        serde_json::from_str(&self.0).map_err(SceneError::Restore)
    }

    /// Wrap a previously serialized capture without validating it.
    /// Validation happens on [`Snapshot::restore`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Snapshot(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

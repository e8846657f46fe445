//! meme-editor: the session layer of the meme editor.
//!
//! Owns the pieces one editing session needs: the bounded undo/redo
//! [`History`] of surface snapshots, the [`EditorSession`] that applies
//! user actions to the scene and records them, and share/export
//! composition for finished memes.

pub mod history;
pub mod session;
pub mod share;

pub use history::{History, DEFAULT_MAX_HISTORY};
pub use session::EditorSession;
pub use share::{SharePlatform, EXPORT_FILE_NAME, SHARE_TEXT};

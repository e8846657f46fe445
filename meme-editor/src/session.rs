//! One meme editing session.
//!
//! The session is the explicit owner of everything the editor mutates:
//! the scene (the live surface state), the undo/redo [`History`], and the
//! current selection. Nothing here is shared or global, so multiple
//! sessions can run side by side.
//!
//! Every completed mutation captures a snapshot and records it, mirroring
//! the surface's own contract: record after the change, undo/redo hand
//! back a snapshot for the surface to re-render wholesale.

use meme_scene::{
    BackgroundV1, CaptionSlotV1, ElementKindV1, SceneError, SceneV1, Snapshot, TextStyleV1,
    DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH,
};
use meme_templates::TemplateV1;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::history::History;

/// Horizontal placement for new captions.
const CAPTION_LEFT: f32 = 50.0;

/// Placement for new stickers.
const STICKER_LEFT: f32 = 100.0;
const STICKER_TOP: f32 = 100.0;

/// Base placement and per-image cascade offset for uploads.
const UPLOAD_OFFSET_BASE: f32 = 100.0;
const UPLOAD_OFFSET_STEP: f32 = 20.0;

/// Default scale for uploaded image overlays.
const UPLOAD_SCALE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub session_id: Uuid,
    scene: SceneV1,
    history: History,
    selection: Option<Uuid>,
}

impl EditorSession {
    /// Start a session on the default surface size.
    pub fn new() -> Self {
        Self::with_surface(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }

    pub fn with_surface(width: u32, height: u32) -> Self {
        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, width, height, "starting editing session");
        Self {
            session_id,
            scene: SceneV1::new(width, height),
            history: History::new(),
            selection: None,
        }
    }

    pub fn scene(&self) -> &SceneV1 {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    /// Capture the scene and record it. Called after every completed
    /// mutation; never before one.
    fn commit(&mut self) -> Result<(), SceneError> {
        let snapshot = Snapshot::capture(&self.scene)?;
        self.history.record(snapshot);
        Ok(())
    }

    /// Replace the whole surface with a template: clears existing content
    /// and sets the fitted, centered background.
    pub fn load_template(&mut self, template: &TemplateV1) -> Result<(), SceneError> {
        info!(
            session_id = %self.session_id,
            template_id = %template.id,
            template = %template.name,
            "loading template"
        );

        self.scene.clear();
        self.selection = None;
        self.scene.set_background(BackgroundV1::fitted(
            &template.id,
            &template.url,
            template.width,
            template.height,
            self.scene.width,
            self.scene.height,
        ));
        self.commit()
    }

    /// Add top and/or bottom captions in one step. Empty or missing text
    /// for a slot is skipped; if both are skipped nothing is recorded.
    /// Returns the ids of the captions actually added.
    pub fn add_captions(
        &mut self,
        top: Option<&str>,
        bottom: Option<&str>,
        fill: &str,
        font_size: f32,
    ) -> Result<Vec<Uuid>, SceneError> {
        let mut added = Vec::new();

        for (slot, text) in [(CaptionSlotV1::Top, top), (CaptionSlotV1::Bottom, bottom)] {
            let Some(text) = text else { continue };
            if text.trim().is_empty() {
                continue;
            }

            let id = self.scene.push_element(
                CAPTION_LEFT,
                slot.default_top(self.scene.height),
                ElementKindV1::Caption {
                    text: text.to_owned(),
                    slot,
                    style: TextStyleV1::caption(fill, font_size),
                },
            );
            added.push(id);
        }

        if added.is_empty() {
            debug!("no caption text provided, nothing recorded");
            return Ok(added);
        }

        self.commit()?;
        Ok(added)
    }

    /// Add an emoji/sticker glyph at the default placement.
    pub fn add_sticker(&mut self, glyph: &str) -> Result<Uuid, SceneError> {
        let id = self.scene.push_element(
            STICKER_LEFT,
            STICKER_TOP,
            ElementKindV1::Sticker {
                glyph: glyph.to_owned(),
                style: TextStyleV1::sticker(),
            },
        );
        self.commit()?;
        Ok(id)
    }

    /// Add uploaded image overlays, cascading their placement so a batch
    /// does not stack exactly on top of itself. One snapshot for the
    /// whole batch.
    pub fn add_images<I, S>(&mut self, sources: I) -> Result<Vec<Uuid>, SceneError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();

        for (i, source) in sources.into_iter().enumerate() {
            let offset = UPLOAD_OFFSET_BASE + UPLOAD_OFFSET_STEP * i as f32;
            let id = self.scene.push_element(
                offset,
                offset,
                ElementKindV1::Image {
                    source: source.into(),
                    scale_x: UPLOAD_SCALE,
                    scale_y: UPLOAD_SCALE,
                },
            );
            added.push(id);
        }

        if added.is_empty() {
            return Ok(added);
        }

        self.commit()?;
        Ok(added)
    }

    /// Select an element. Selection is not a mutation: nothing is
    /// recorded. Returns false for unknown ids.
    pub fn select(&mut self, element_id: Uuid) -> bool {
        if self.scene.element(element_id).is_none() {
            warn!(element_id = %element_id, "cannot select unknown element");
            return false;
        }
        self.selection = Some(element_id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move the selected element. `Ok(false)` without a selection.
    pub fn move_selected(&mut self, left: f32, top: f32) -> Result<bool, SceneError> {
        let Some(id) = self.selection else {
            debug!("move requested with no selection");
            return Ok(false);
        };
        if !self.scene.move_element(id, left, top) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Scale the selected element by a factor. `Ok(false)` without a
    /// selection or for an invalid factor.
    pub fn scale_selected(&mut self, factor: f32) -> Result<bool, SceneError> {
        let Some(id) = self.selection else {
            debug!("scale requested with no selection");
            return Ok(false);
        };
        if !self.scene.scale_element(id, factor) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Delete the selected element. `Ok(false)` without a selection.
    pub fn remove_selected(&mut self) -> Result<bool, SceneError> {
        let Some(id) = self.selection.take() else {
            debug!("delete requested with no selection");
            return Ok(false);
        };
        if !self.scene.remove_element(id) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Step the surface back one snapshot. `Ok(false)` when there is
    /// nothing to undo. On a restore failure the history cursor and
    /// entries are untouched and the scene is unchanged, so the caller
    /// can surface the error and retry later.
    pub fn undo(&mut self) -> Result<bool, SceneError> {
        let restored = match self.history.peek_undo() {
            Some(snapshot) => snapshot.restore()?,
            None => {
                debug!(session_id = %self.session_id, "nothing to undo");
                return Ok(false);
            }
        };

        self.history.undo();
        self.scene = restored;
        self.selection = None;
        debug!(session_id = %self.session_id, cursor = ?self.history.cursor(), "undid to snapshot");
        Ok(true)
    }

    /// Step the surface forward one snapshot. Same contract as
    /// [`EditorSession::undo`].
    pub fn redo(&mut self) -> Result<bool, SceneError> {
        let restored = match self.history.peek_redo() {
            Some(snapshot) => snapshot.restore()?,
            None => {
                debug!(session_id = %self.session_id, "nothing to redo");
                return Ok(false);
            }
        };

        self.history.redo();
        self.scene = restored;
        self.selection = None;
        debug!(session_id = %self.session_id, cursor = ?self.history.cursor(), "redid to snapshot");
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meme_templates::fallback_catalog;

    fn template() -> TemplateV1 {
        fallback_catalog().remove(0)
    }

    #[test]
    fn test_selection_is_not_a_mutation() {
        let mut session = EditorSession::new();
        let id = session.add_sticker("🔥").unwrap();
        let recorded = session.history().len();

        assert!(session.select(id));
        session.clear_selection();
        assert_eq!(session.history().len(), recorded);
    }

    #[test]
    fn test_select_unknown_element_fails() {
        let mut session = EditorSession::new();
        assert!(!session.select(Uuid::new_v4()));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_empty_captions_record_nothing() {
        let mut session = EditorSession::new();
        let added = session.add_captions(Some("   "), None, "#ffffff", 30.0).unwrap();
        assert!(added.is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_ops_without_selection_are_noops() {
        let mut session = EditorSession::new();
        assert!(!session.move_selected(10.0, 10.0).unwrap());
        assert!(!session.scale_selected(2.0).unwrap());
        assert!(!session.remove_selected().unwrap());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_load_template_replaces_content() {
        let mut session = EditorSession::new();
        session.add_sticker("🔥").unwrap();

        session.load_template(&template()).unwrap();
        assert_eq!(session.scene().element_count(), 0);
        assert!(session.scene().background.is_some());
    }

    #[test]
    fn test_undo_on_fresh_session_is_noop() {
        let mut session = EditorSession::new();
        assert!(!session.undo().unwrap());
        assert!(!session.redo().unwrap());
    }

    #[test]
    fn test_failed_undo_restore_leaves_session_untouched() {
        let mut session = EditorSession::new();
        session.add_sticker("🔥").unwrap();

        // A capture that will not deserialize, wedged under a good one so
        // it is the next undo target.
        session.history.record(Snapshot::from_raw("{broken"));
        session.add_sticker("😂").unwrap();

        let scene_before = session.scene().clone();
        let cursor_before = session.history().cursor();
        let len_before = session.history().len();

        assert!(matches!(session.undo(), Err(SceneError::Restore(_))));

        assert_eq!(session.scene(), &scene_before);
        assert_eq!(session.history().cursor(), cursor_before);
        assert_eq!(session.history().len(), len_before);

        // the log is still consistent for a future retry
        assert!(session.can_undo());
    }

    #[test]
    fn test_failed_redo_restore_leaves_session_untouched() {
        let mut session = EditorSession::new();
        session.add_sticker("🔥").unwrap();
        session.history.record(Snapshot::from_raw("{broken"));
        session.history.undo();

        let scene_before = session.scene().clone();
        let cursor_before = session.history().cursor();

        assert!(matches!(session.redo(), Err(SceneError::Restore(_))));

        assert_eq!(session.scene(), &scene_before);
        assert_eq!(session.history().cursor(), cursor_before);
        assert!(session.can_redo());
    }
}

//! meme-scene: the serializable visual state of one meme editing surface.
//!
//! Design rules:
//! - The scene is a plain value: a background template plus an ordered list
//!   of elements. Z-order is element order; the last element renders on top.
//! - Everything is serde-serializable so the whole surface can be captured
//!   as an opaque [`Snapshot`] and restored later.
//! - Sizes are bounded and clamped, never rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod snapshot;

pub use snapshot::Snapshot;

/// Schema version carried by every serialized scene.
pub const SCENE_SCHEMA_VERSION: &str = "1.0";

/// Default editing-surface size (the desktop canvas).
pub const DEFAULT_SURFACE_WIDTH: u32 = 500;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 400;

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 200.0;

/// Font size used when a caller passes a non-finite value.
pub const DEFAULT_FONT_SIZE: f32 = 30.0;

/// Default size for sticker glyphs.
pub const STICKER_FONT_SIZE: f32 = 50.0;

/// Clamp a font size into the supported range.
pub fn clamp_font_size(size: f32) -> f32 {
    if !size.is_finite() {
        warn!(size, "non-finite font size, using default");
        return DEFAULT_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Which caption position a text element was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionSlotV1 {
    Top,
    Bottom,
}

impl CaptionSlotV1 {
    /// Default vertical placement for this slot on a surface of the given
    /// height. Top captions sit near the top edge, bottom captions 50px
    /// above the bottom edge.
    pub fn default_top(&self, surface_height: u32) -> f32 {
        match self {
            CaptionSlotV1::Top => 20.0,
            CaptionSlotV1::Bottom => surface_height as f32 - 50.0,
        }
    }
}

/// Text styling shared by captions and stickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyleV1 {
    /// CSS-style fill color, e.g. "#ffffff".
    pub fill: String,
    pub font_size: f32,
    pub font_family: String,
    pub bold: bool,
    /// Outline color, if any.
    pub stroke: Option<String>,
    pub stroke_width: f32,
}

impl TextStyleV1 {
    /// Classic meme caption styling: bold Impact with a black outline.
    pub fn caption(fill: impl Into<String>, font_size: f32) -> Self {
        Self {
            fill: fill.into(),
            font_size: clamp_font_size(font_size),
            font_family: "Impact".into(),
            bold: true,
            stroke: Some("#000000".into()),
            stroke_width: 2.0,
        }
    }

    /// Plain styling for sticker glyphs.
    pub fn sticker() -> Self {
        Self {
            fill: "#ffffff".into(),
            font_size: STICKER_FONT_SIZE,
            font_family: "Arial".into(),
            bold: false,
            stroke: None,
            stroke_width: 0.0,
        }
    }
}

/// What an element is; position lives on [`ElementV1`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ElementKindV1 {
    /// A meme caption in the top or bottom slot.
    Caption {
        text: String,
        slot: CaptionSlotV1,
        style: TextStyleV1,
    },
    /// An emoji or sticker glyph.
    Sticker { glyph: String, style: TextStyleV1 },
    /// A user-uploaded image overlay.
    Image {
        source: String,
        scale_x: f32,
        scale_y: f32,
    },
}

/// One positioned element on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementV1 {
    pub element_id: Uuid,
    pub left: f32,
    pub top: f32,
    pub kind: ElementKindV1,
}

/// A loaded template image. The background is not an element: it is not
/// selectable and never participates in move/resize/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundV1 {
    pub template_id: String,
    pub url: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl BackgroundV1 {
    /// Fit a template image onto the surface: scale by the smaller of the
    /// two axis ratios (no cropping, no stretching) and center it.
    pub fn fitted(
        template_id: impl Into<String>,
        url: impl Into<String>,
        image_width: u32,
        image_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Self {
        let (scale, offset_x, offset_y) = if image_width == 0 || image_height == 0 {
            warn!(image_width, image_height, "template has no dimensions, placing unscaled");
            (1.0, 0.0, 0.0)
        } else {
            let scale_x = surface_width as f32 / image_width as f32;
            let scale_y = surface_height as f32 / image_height as f32;
            let scale = scale_x.min(scale_y);
            (
                scale,
                (surface_width as f32 - image_width as f32 * scale) / 2.0,
                (surface_height as f32 - image_height as f32 * scale) / 2.0,
            )
        };

        Self {
            template_id: template_id.into(),
            url: url.into(),
            offset_x,
            offset_y,
            scale,
        }
    }
}

/// The complete visual state of one editing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneV1 {
    pub schema_version: String,
    pub width: u32,
    pub height: u32,
    pub background: Option<BackgroundV1>,
    /// Oldest first; the last element renders on top.
    pub elements: Vec<ElementV1>,
}

impl Default for SceneV1 {
    fn default() -> Self {
        SceneV1::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }
}

impl SceneV1 {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            schema_version: SCENE_SCHEMA_VERSION.to_string(),
            width,
            height,
            background: None,
            elements: Vec::new(),
        }
    }

    /// Append a new element, assigning it a fresh id. New elements always
    /// land on top of the stack.
    pub fn push_element(&mut self, left: f32, top: f32, kind: ElementKindV1) -> Uuid {
        let element_id = Uuid::new_v4();
        debug!(element_id = %element_id, left, top, "adding element");
        self.elements.push(ElementV1 {
            element_id,
            left,
            top,
            kind,
        });
        element_id
    }

    pub fn element(&self, element_id: Uuid) -> Option<&ElementV1> {
        self.elements.iter().find(|e| e.element_id == element_id)
    }

    pub fn element_mut(&mut self, element_id: Uuid) -> Option<&mut ElementV1> {
        self.elements.iter_mut().find(|e| e.element_id == element_id)
    }

    /// Remove an element by id. Returns false for unknown ids.
    pub fn remove_element(&mut self, element_id: Uuid) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.element_id != element_id);
        let removed = self.elements.len() != before;
        if !removed {
            warn!(element_id = %element_id, "attempted to remove unknown element");
        }
        removed
    }

    /// Reposition an element. Returns false for unknown ids.
    pub fn move_element(&mut self, element_id: Uuid, left: f32, top: f32) -> bool {
        match self.element_mut(element_id) {
            Some(element) => {
                element.left = left;
                element.top = top;
                true
            }
            None => {
                warn!(element_id = %element_id, "attempted to move unknown element");
                false
            }
        }
    }

    /// Scale an element by a factor. Text elements scale their font size
    /// (clamped); images scale both axes. Non-finite or non-positive
    /// factors are rejected.
    pub fn scale_element(&mut self, element_id: Uuid, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(element_id = %element_id, factor, "rejecting invalid scale factor");
            return false;
        }

        match self.element_mut(element_id) {
            Some(element) => {
                match &mut element.kind {
                    ElementKindV1::Caption { style, .. } | ElementKindV1::Sticker { style, .. } => {
                        style.font_size = clamp_font_size(style.font_size * factor);
                    }
                    ElementKindV1::Image { scale_x, scale_y, .. } => {
                        *scale_x *= factor;
                        *scale_y *= factor;
                    }
                }
                true
            }
            None => {
                warn!(element_id = %element_id, "attempted to scale unknown element");
                false
            }
        }
    }

    pub fn set_background(&mut self, background: BackgroundV1) {
        self.background = Some(background);
    }

    /// Drop the background and every element.
    pub fn clear(&mut self) {
        debug!(elements = self.elements.len(), "clearing scene");
        self.background = None;
        self.elements.clear();
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_blank(&self) -> bool {
        self.background.is_none() && self.elements.is_empty()
    }
}

/// Scene-level errors. The scene itself only fails at the serialization
/// boundary; structural mutations clamp or no-op instead.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to serialize scene: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to restore snapshot: {0}")]
    Restore(#[source] serde_json::Error),
}

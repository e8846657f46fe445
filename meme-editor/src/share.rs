//! Share-link and export-name composition.
//!
//! Pure string building: the rendered image itself (a hosted URL or a
//! data URL) comes from the rendering collaborator, not from here.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

/// Default name offered for a downloaded meme.
pub const EXPORT_FILE_NAME: &str = "meme.png";

/// The fixed text attached to shared memes.
pub const SHARE_TEXT: &str = "Check out this meme I created using MemeGen!";

/// The characters `encodeURIComponent` leaves alone, minus alphanumerics
/// (which `NON_ALPHANUMERIC` already excludes from encoding).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a URL query component.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

/// Platforms a finished meme can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    Facebook,
    WhatsApp,
}

impl SharePlatform {
    /// Compose the share URL for this platform around an already-exported
    /// image URL.
    pub fn share_url(&self, image_url: &str) -> String {
        match self {
            SharePlatform::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode_component(SHARE_TEXT),
                encode_component(image_url),
            ),
            SharePlatform::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                encode_component(image_url),
            ),
            SharePlatform::WhatsApp => {
                let message = format!("{SHARE_TEXT} {image_url}");
                format!("https://wa.me/?text={}", encode_component(&message))
            }
        }
    }
}

/// A per-session export name, so two sessions saving side by side do not
/// clobber each other's download.
pub fn suggested_export_name(session_id: Uuid) -> String {
    let id = session_id.simple().to_string();
    format!("meme-{}.png", &id[..8])
}

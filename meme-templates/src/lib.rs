// This defines the JSON shape we accept from the meme-template API.
// Parse and validate it, and keep a hard-coded fallback catalog so the
// editor always has templates to offer, even with no working network.
// Transport itself (the HTTP fetch) stays with the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// One meme template as the remote API describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateV1 {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub box_count: u32,
}

/// The `get_memes` response envelope.
#[derive(Debug, Deserialize)]
struct GetMemesEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<MemeList>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemeList {
    memes: Vec<TemplateV1>,
}

/// Errors from interpreting a template API response.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("template api reported failure: {message}")]
    ApiFailure { message: String },

    #[error("template api response contained no templates")]
    Empty,

    #[error("failed to parse template api response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a raw `get_memes` response body into a template catalog.
pub fn parse_catalog(json: &str) -> Result<Vec<TemplateV1>, CatalogError> {
    let envelope: GetMemesEnvelope = serde_json::from_str(json)?;

    if !envelope.success {
        return Err(CatalogError::ApiFailure {
            message: envelope
                .error_message
                .unwrap_or_else(|| "no error message".into()),
        });
    }

    let memes = envelope.data.map(|d| d.memes).unwrap_or_default();
    if memes.is_empty() {
        return Err(CatalogError::Empty);
    }

    debug!(count = memes.len(), "parsed remote template catalog");
    Ok(memes)
}

/// Fetch and parse the remote catalog, falling back to the built-in set
/// when the fetch or the parse fails. `fetch` is the caller's transport;
/// it returns the raw response body.
pub fn load_catalog(fetch: impl FnOnce() -> anyhow::Result<String>) -> Vec<TemplateV1> {
    match fetch() {
        Ok(body) => match parse_catalog(&body) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "remote catalog unusable, using fallback");
                fallback_catalog()
            }
        },
        Err(err) => {
            warn!(error = %err, "template fetch failed, using fallback");
            fallback_catalog()
        }
    }
}

/// The built-in template set used when the remote catalog is unavailable.
pub fn fallback_catalog() -> Vec<TemplateV1> {
    fn t(id: &str, name: &str, width: u32, height: u32, box_count: u32) -> TemplateV1 {
        TemplateV1 {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://i.imgflip.com/{id}.jpg"),
            width,
            height,
            box_count,
        }
    }

    vec![
        t("1g8my4", "Two Buttons", 600, 908, 3),
        t("1ur9b0", "Drake Hotline Bling", 1200, 1200, 2),
        t("1h7in3", "Change My Mind", 482, 361, 2),
        t("1otk96", "Is This A Pigeon?", 1587, 1425, 3),
        t("1yxk7k", "Surprised Pikachu", 1893, 1893, 3),
        t("30b1gx", "Always Has Been", 960, 540, 2),
        t("1e7ql7", "Roll Safe Think About It", 702, 395, 2),
        t("1c1uej", "Mocking Spongebob", 502, 353, 2),
        t("1o00in", "Gru's Plan", 700, 1000, 4),
    ]
}

/// Case-insensitive substring search on template names. An empty or
/// whitespace-only query matches everything.
pub fn search<'a>(catalog: &'a [TemplateV1], query: &str) -> Vec<&'a TemplateV1> {
    let query = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|template| query.is_empty() || template.name.to_lowercase().contains(&query))
        .collect()
}

/// Deterministically pick a start-up template from a seed. Same seed,
/// same catalog, same pick.
pub fn pick_default(catalog: &[TemplateV1], seed: u64) -> Option<&TemplateV1> {
    if catalog.is_empty() {
        return None;
    }
    let index = (mix_seed(seed) % catalog.len() as u64) as usize;
    catalog.get(index)
}

// SplitMix64-ish mixing (stable, fast, no deps)
fn mix_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> &'static str {
        r#"{
            "success": true,
            "data": {
                "memes": [
                    {
                        "id": "181913649",
                        "name": "Drake Hotline Bling",
                        "url": "https://i.imgflip.com/30b1gx.jpg",
                        "width": 1200,
                        "height": 1200,
                        "box_count": 2
                    },
                    {
                        "id": "87743020",
                        "name": "Two Buttons",
                        "url": "https://i.imgflip.com/1g8my4.jpg",
                        "width": 600,
                        "height": 908,
                        "box_count": 3
                    }
                ]
            }
        }"#
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(sample_response()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "Drake Hotline Bling");
        assert_eq!(catalog[1].box_count, 3);
    }

    #[test]
    fn test_parse_rejects_api_failure() {
        let body = r#"{"success": false, "error_message": "rate limited"}"#;
        match parse_catalog(body) {
            Err(CatalogError::ApiFailure { message }) => assert_eq!(message, "rate limited"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_empty_catalog() {
        let body = r#"{"success": true, "data": {"memes": []}}"#;
        assert!(matches!(parse_catalog(body), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_catalog("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_catalog_falls_back_on_fetch_error() {
        let catalog = load_catalog(|| Err(anyhow::anyhow!("connection refused")));
        assert_eq!(catalog, fallback_catalog());
    }

    #[test]
    fn test_load_catalog_falls_back_on_bad_body() {
        let catalog = load_catalog(|| Ok("<html>502</html>".to_string()));
        assert_eq!(catalog, fallback_catalog());
    }

    #[test]
    fn test_load_catalog_uses_remote_when_available() {
        let catalog = load_catalog(|| Ok(sample_response().to_string()));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_fallback_catalog_is_complete() {
        let catalog = fallback_catalog();
        assert_eq!(catalog.len(), 9);
        assert!(catalog.iter().all(|t| t.url.starts_with("https://")));
        assert!(catalog.iter().all(|t| t.width > 0 && t.height > 0));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = fallback_catalog();
        let hits = search(&catalog, "DRAKE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Drake Hotline Bling");
    }

    #[test]
    fn test_search_empty_query_matches_all() {
        let catalog = fallback_catalog();
        assert_eq!(search(&catalog, "").len(), catalog.len());
        assert_eq!(search(&catalog, "   ").len(), catalog.len());
    }

    #[test]
    fn test_pick_default_is_deterministic_and_in_range() {
        let catalog = fallback_catalog();
        for seed in 0..64 {
            let a = pick_default(&catalog, seed).unwrap();
            let b = pick_default(&catalog, seed).unwrap();
            assert_eq!(a, b);
        }
        assert!(pick_default(&[], 7).is_none());
    }
}

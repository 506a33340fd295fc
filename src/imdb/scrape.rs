use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static MEDIA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"mediaviewer/[^"]*"#).expect("valid mediaviewer regex"));
static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img regex"));
static SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*['"]([^'"]*)['"]"#).expect("valid src regex"));

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Extracts the movie title from an IMDB title page.
///
/// `The Shawshank Redemption (1994) - IMDb` becomes `The Shawshank Redemption`.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let raw = raw.split(" (").next().unwrap_or(raw);
    let raw = raw.strip_suffix(" - IMDb").unwrap_or(raw);
    let title = decode_entities(raw.trim());

    if title.is_empty() { None } else { Some(title) }
}

/// Returns the first `mediaviewer/...` link of a title page, query included.
pub fn extract_media_path(html: &str) -> Option<String> {
    MEDIA_RE.find(html).map(|m| m.as_str().to_string())
}

/// Collects the `src` of every poster-like `<img>` tag, in page order.
///
/// Tags served from `//fls-` tracking hosts are dropped unless they point
/// at a `.jpg` or `.png`.
pub fn extract_image_sources(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    IMG_RE
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| tag.contains(".jpg") || tag.contains(".png") || !tag.contains("//fls-"))
        .filter_map(|tag| SRC_RE.captures(tag))
        .filter_map(|c| c.get(1).map(|m| decode_entities(m.as_str().trim())))
        .filter(|src| !src.is_empty())
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

pub fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    normalize_extension(ext)
}

pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let ext = mime.strip_prefix("image/")?;
    normalize_extension(ext)
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    if ext == "jpeg" {
        return Some("jpg".to_string());
    }
    Some(ext)
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

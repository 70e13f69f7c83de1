//! Content analysis for file-like values
//!
//! File-like values derive metadata from their bytes: a content type, a
//! thumbnail for images, extracted text for documents. The derivation sits
//! behind [`ContentAnalyzer`] so that storage layers can plug in a heavier
//! implementation. [`SignatureAnalyzer`] is the built-in one: it sniffs magic
//! numbers and recognises UTF-8 text.

use once_cell::sync::Lazy;
use std::sync::Arc;

/// Fallback content type for unrecognised bytes.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Derives metadata from file contents.
///
/// Implementations must be pure: the same bytes always produce the same
/// results. Wrappers call each method at most once per value and cache the
/// result.
pub trait ContentAnalyzer: Send + Sync {
    /// MIME type of the content.
    fn content_type(&self, content: &[u8]) -> String;

    /// Thumbnail bytes for an image.
    fn thumbnail(&self, content: &[u8]) -> Vec<u8>;

    /// Plain text of a document. Empty when nothing can be extracted.
    fn extract_text(&self, content: &[u8]) -> String;
}

/// Analyzer shared by values built without an explicit one.
pub fn default_analyzer() -> Arc<dyn ContentAnalyzer> {
    static DEFAULT: Lazy<Arc<dyn ContentAnalyzer>> = Lazy::new(|| Arc::new(SignatureAnalyzer));
    Arc::clone(&DEFAULT)
}

/// Magic-number based analyzer.
///
/// Thumbnails are the image itself; raster scaling is left to analyzers with
/// an imaging backend. Text is extracted from plain text, HTML and XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureAnalyzer;

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"II*\x00", "image/tiff"),
    (b"MM\x00*", "image/tiff"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"OggS", "audio/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"fLaC", "audio/flac"),
    (b"\x1a\x45\xdf\xa3", "video/webm"),
];

impl SignatureAnalyzer {
    fn sniff_binary(content: &[u8]) -> Option<&'static str> {
        if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| content.starts_with(magic)) {
            return Some(*mime);
        }
        if content.len() >= 12 && content.starts_with(b"RIFF") {
            return match &content[8..12] {
                b"WEBP" => Some("image/webp"),
                b"WAVE" => Some("audio/wav"),
                b"AVI " => Some("video/x-msvideo"),
                _ => None,
            };
        }
        if content.len() >= 12 && &content[4..8] == b"ftyp" {
            return match &content[8..12] {
                b"M4A " => Some("audio/mp4"),
                b"qt  " => Some("video/quicktime"),
                _ => Some("video/mp4"),
            };
        }
        if content.len() >= 2 && content[0] == 0xff && content[1] & 0xe0 == 0xe0 {
            return Some("audio/mpeg");
        }
        None
    }

    fn sniff_text(text: &str) -> &'static str {
        let head = text.trim_start_matches('\u{feff}').trim_start();
        let lower: String = head.chars().take(16).collect::<String>().to_ascii_lowercase();
        if lower.starts_with("<?xml") {
            "application/xml"
        } else if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
            "text/html"
        } else if lower.starts_with("<svg") {
            "image/svg+xml"
        } else {
            "text/plain"
        }
    }
}

impl ContentAnalyzer for SignatureAnalyzer {
    fn content_type(&self, content: &[u8]) -> String {
        if content.is_empty() {
            return OCTET_STREAM.to_string();
        }
        if let Some(mime) = Self::sniff_binary(content) {
            return mime.to_string();
        }
        match std::str::from_utf8(content) {
            Ok(text) if !text.contains('\0') => Self::sniff_text(text).to_string(),
            _ => OCTET_STREAM.to_string(),
        }
    }

    fn thumbnail(&self, content: &[u8]) -> Vec<u8> {
        content.to_vec()
    }

    fn extract_text(&self, content: &[u8]) -> String {
        if Self::sniff_binary(content).is_some() {
            return String::new();
        }
        match std::str::from_utf8(content) {
            Ok(text) if !text.contains('\0') => match Self::sniff_text(text) {
                "text/html" | "application/xml" | "image/svg+xml" => strip_markup(text),
                _ => text.trim().to_string(),
            },
            _ => String::new(),
        }
    }
}

/// Text content of markup: tags removed, common entities decoded,
/// whitespace collapsed.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    let mut skip_until: Option<&str> = None;

    while !rest.is_empty() {
        if let Some(end) = skip_until {
            match find_ignore_case(rest, end) {
                Some(i) => {
                    rest = &rest[i + end.len()..];
                    skip_until = None;
                }
                None => break,
            }
            continue;
        }
        match rest.find('<') {
            Some(open) => {
                out.push_str(&rest[..open]);
                let tag = &rest[open..];
                if let Some(body) = tag.strip_prefix("<!--") {
                    out.push(' ');
                    rest = body;
                    skip_until = Some("-->");
                    continue;
                }
                let close = match tag.find('>') {
                    Some(close) => close,
                    None => break,
                };
                let name = tag_name(tag);
                if name == "script" {
                    skip_until = Some("</script>");
                } else if name == "style" {
                    skip_until = Some("</style>");
                }
                if !INLINE_TAGS.contains(&name.as_str()) {
                    out.push(' ');
                }
                rest = &tag[close + 1..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }

    let decoded = decode_entities(&out);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "em", "i", "mark", "small", "span", "strong", "sub", "sup", "u",
];

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

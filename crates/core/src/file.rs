//! File-like value wrappers and their composite encoding
//!
//! A [`File`] is a byte buffer with a derived content type. [`Image`] adds a
//! derived thumbnail and [`Document`] adds extracted text. Derived artifacts
//! are computed by a [`ContentAnalyzer`] the first time they are read and then
//! frozen for the wrapper's lifetime (`OnceCell`), so wrappers can be shared
//! across threads and read concurrently.
//!
//! ## Composite encoding
//!
//! For transport to the storage layer each wrapper encodes as a parenthesized
//! tuple whose binary members are `\\x`-prefixed hex:
//!
//! ```text
//! file     (\\x<hex>,<content-type>)
//! image    (\\x<hex>,\\x<thumbnail-hex>,<content-type>)
//! document (\\x<hex>,"<text, quotes doubled>",<content-type>)
//! ```
//!
//! Decoding also accepts the quoted form a database emits for composite
//! columns (`("\\x0102",image/png)`) and the single-backslash `\x` prefix.

use crate::content::{default_analyzer, ContentAnalyzer};
use crate::error::{SchemaError, SchemaResult};
use crate::hex;
use crate::kind::PrimitiveKind;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// File
// ============================================================================

/// Byte buffer with a lazily derived content type.
#[derive(Clone)]
pub struct File {
    content: Vec<u8>,
    name: Option<String>,
    content_type: OnceCell<String>,
    analyzer: Arc<dyn ContentAnalyzer>,
}

impl File {
    /// Wrap bytes, deriving metadata with the default analyzer.
    pub fn new(content: Vec<u8>) -> Self {
        Self::with_analyzer(content, default_analyzer())
    }

    /// Wrap bytes, deriving metadata with `analyzer`.
    pub fn with_analyzer(content: Vec<u8>, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        File {
            content,
            name: None,
            content_type: OnceCell::new(),
            analyzer,
        }
    }

    /// Rebuild a file whose content type is already known.
    pub fn from_parts(content: Vec<u8>, content_type: impl Into<String>) -> Self {
        let file = Self::new(content);
        let _ = file.content_type.set(content_type.into());
        file
    }

    /// Attach an original file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Raw bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Take the raw bytes.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Original file name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True when there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// MIME type, derived on first access.
    pub fn content_type(&self) -> &str {
        self.content_type
            .get_or_init(|| self.analyzer.content_type(&self.content))
    }

    pub(crate) fn analyzer(&self) -> &Arc<dyn ContentAnalyzer> {
        &self.analyzer
    }

    /// Composite encoding `(\\x<hex>,<content-type>)`.
    pub fn encode(&self) -> String {
        format!("({},{})", hex_field(&self.content), self.content_type())
    }

    /// Inverse of [`File::encode`].
    pub fn decode(s: &str) -> SchemaResult<File> {
        Self::decode_as(PrimitiveKind::File, s)
    }

    pub(crate) fn decode_as(kind: PrimitiveKind, s: &str) -> SchemaResult<File> {
        let body = composite_body(kind, s)?;
        let (content, content_type) = body
            .split_once(',')
            .ok_or_else(|| invalid(kind, s))?;
        Ok(File::from_parts(
            decode_hex_field(kind, s, content)?,
            unquote(content_type.trim()),
        ))
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.content_type() == other.content_type()
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("len", &self.content.len())
            .field("name", &self.name)
            .field("content_type", &self.content_type.get())
            .finish()
    }
}

// ============================================================================
// Image
// ============================================================================

/// Image file with a lazily derived thumbnail.
#[derive(Clone)]
pub struct Image {
    file: File,
    thumbnail: OnceCell<Vec<u8>>,
}

impl Image {
    /// Wrap image bytes with the default analyzer.
    pub fn new(content: Vec<u8>) -> Self {
        Self::from_file(File::new(content))
    }

    /// Wrap image bytes with `analyzer`.
    pub fn with_analyzer(content: Vec<u8>, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        Self::from_file(File::with_analyzer(content, analyzer))
    }

    /// Treat a generic file as an image.
    pub fn from_file(file: File) -> Self {
        Image {
            file,
            thumbnail: OnceCell::new(),
        }
    }

    /// Rebuild an image whose derived artifacts are already known.
    pub fn from_parts(content: Vec<u8>, thumbnail: Vec<u8>, content_type: impl Into<String>) -> Self {
        let image = Self::from_file(File::from_parts(content, content_type));
        let _ = image.thumbnail.set(thumbnail);
        image
    }

    /// Underlying file.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Raw bytes.
    pub fn content(&self) -> &[u8] {
        self.file.content()
    }

    /// MIME type, derived on first access.
    pub fn content_type(&self) -> &str {
        self.file.content_type()
    }

    /// Thumbnail bytes, derived on first access.
    pub fn thumbnail(&self) -> &[u8] {
        self.thumbnail
            .get_or_init(|| self.file.analyzer().thumbnail(self.file.content()))
    }

    /// Composite encoding `(\\x<hex>,\\x<thumbnail-hex>,<content-type>)`.
    pub fn encode(&self) -> String {
        format!(
            "({},{},{})",
            hex_field(self.content()),
            hex_field(self.thumbnail()),
            self.content_type()
        )
    }

    /// Inverse of [`Image::encode`].
    pub fn decode(s: &str) -> SchemaResult<Image> {
        let kind = PrimitiveKind::Image;
        let body = composite_body(kind, s)?;
        let mut parts = body.splitn(3, ',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(content), Some(thumbnail), Some(content_type)) => Ok(Image::from_parts(
                decode_hex_field(kind, s, content)?,
                decode_hex_field(kind, s, thumbnail)?,
                unquote(content_type.trim()),
            )),
            _ => Err(invalid(kind, s)),
        }
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.thumbnail() == other.thumbnail()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("file", &self.file)
            .field("thumbnail_len", &self.thumbnail.get().map(Vec::len))
            .finish()
    }
}

// ============================================================================
// Document
// ============================================================================

/// Document file with lazily extracted text.
#[derive(Clone)]
pub struct Document {
    file: File,
    text: OnceCell<String>,
}

impl Document {
    /// Wrap document bytes with the default analyzer.
    pub fn new(content: Vec<u8>) -> Self {
        Self::from_file(File::new(content))
    }

    /// Wrap document bytes with `analyzer`.
    pub fn with_analyzer(content: Vec<u8>, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        Self::from_file(File::with_analyzer(content, analyzer))
    }

    /// Treat a generic file as a document.
    pub fn from_file(file: File) -> Self {
        Document {
            file,
            text: OnceCell::new(),
        }
    }

    /// Document with a fixed text; the content type is still derived.
    pub fn with_text(file: File, text: impl Into<String>) -> Self {
        let document = Self::from_file(file);
        let _ = document.text.set(text.into());
        document
    }

    /// Rebuild a document whose derived artifacts are already known.
    pub fn from_parts(content: Vec<u8>, text: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::with_text(File::from_parts(content, content_type), text)
    }

    /// Underlying file.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Raw bytes.
    pub fn content(&self) -> &[u8] {
        self.file.content()
    }

    /// MIME type, derived on first access.
    pub fn content_type(&self) -> &str {
        self.file.content_type()
    }

    /// Extracted text, derived on first access.
    pub fn text(&self) -> &str {
        self.text
            .get_or_init(|| self.file.analyzer().extract_text(self.file.content()))
    }

    /// Composite encoding `(\\x<hex>,"<text>",<content-type>)`.
    pub fn encode(&self) -> String {
        format!(
            "({},\"{}\",{})",
            hex_field(self.content()),
            self.text().replace('"', "\"\""),
            self.content_type()
        )
    }

    /// Inverse of [`Document::encode`].
    ///
    /// The text member may contain commas, so the content is everything up
    /// to the first comma and the content type everything after the last.
    pub fn decode(s: &str) -> SchemaResult<Document> {
        let kind = PrimitiveKind::Document;
        let body = composite_body(kind, s)?;
        let first = body.find(',').ok_or_else(|| invalid(kind, s))?;
        let last = body.rfind(',').ok_or_else(|| invalid(kind, s))?;
        if first == last {
            return Err(invalid(kind, s));
        }
        let text = body[first + 1..last].trim();
        let text = match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            Some(quoted) => quoted.replace("\"\"", "\""),
            None => text.to_string(),
        };
        Ok(Document::from_parts(
            decode_hex_field(kind, s, &body[..first])?,
            text,
            unquote(body[last + 1..].trim()),
        ))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.text() == other.text()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file)
            .field("text_len", &self.text.get().map(String::len))
            .finish()
    }
}

// ============================================================================
// Composite helpers
// ============================================================================

fn invalid(kind: PrimitiveKind, s: &str) -> SchemaError {
    const MAX: usize = 64;
    let shown = match s.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    };
    SchemaError::invalid_value(kind, shown)
}

fn composite_body<'a>(kind: PrimitiveKind, s: &'a str) -> SchemaResult<&'a str> {
    s.trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| invalid(kind, s))
}

/// `\\x`-prefixed hex of `bytes`.
pub(crate) fn hex_field(bytes: &[u8]) -> String {
    format!("\\\\x{}", hex::encode(bytes))
}

/// Decode a hex member, quoted or not, with a `\\x` or `\x` prefix.
pub(crate) fn decode_hex_field(kind: PrimitiveKind, whole: &str, field: &str) -> SchemaResult<Vec<u8>> {
    let field = unquote(field.trim());
    let digits = field
        .strip_prefix("\\\\x")
        .or_else(|| field.strip_prefix("\\x"))
        .ok_or_else(|| invalid(kind, whole))?;
    hex::decode(digits).map_err(|_| invalid(kind, whole))
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

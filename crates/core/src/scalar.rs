//! Structurally validated string scalars
//!
//! Email, URL, color, time zone and XML values are parsed and validated on
//! construction. A value of one of these types is always well formed; the
//! textual form produced by `Display` parses back to an equal value.

use crate::error::{SchemaError, SchemaResult};
use crate::kind::PrimitiveKind;
use chrono::FixedOffset;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("scheme pattern compiles"));

static ZONE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+(?:/[A-Za-z0-9_+\-]+)+$").expect("zone pattern compiles")
});

// ============================================================================
// Email
// ============================================================================

/// An email address, optionally with a display name (`Name <addr>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email {
    display_name: Option<String>,
    address: String,
}

impl Email {
    /// Parse and validate an address.
    pub fn parse(s: &str) -> SchemaResult<Email> {
        let trimmed = s.trim();
        let (display_name, address) = match (trimmed.rfind('<'), trimmed.ends_with('>')) {
            (Some(open), true) => {
                let name = trimmed[..open].trim().trim_matches('"').trim();
                let address = &trimmed[open + 1..trimmed.len() - 1];
                let name = if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                };
                (name, address.trim())
            }
            _ => (None, trimmed),
        };
        if address.len() > 254 || !EMAIL_ADDRESS.is_match(address) {
            return Err(SchemaError::invalid_value(PrimitiveKind::Email, s));
        }
        Ok(Email {
            display_name,
            address: address.to_string(),
        })
    }

    /// The bare address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Display name, if one was given.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.address
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

impl FromStr for Email {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::parse(s)
    }
}

// ============================================================================
// Url
// ============================================================================

/// An absolute URL.
///
/// Hierarchical URLs (`scheme://authority/path`) require an authority unless
/// the scheme is `file`; an explicit port must be a number up to 65535.
/// Opaque URLs (`mailto:`, `urn:`) only require a non-empty remainder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    raw: String,
    scheme_len: usize,
}

impl Url {
    /// Parse and validate a URL.
    pub fn parse(s: &str) -> SchemaResult<Url> {
        let raw = s.trim();
        let invalid = || SchemaError::invalid_value(PrimitiveKind::Url, s);
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (scheme, rest) = raw.split_once(':').ok_or_else(invalid)?;
        if !URL_SCHEME.is_match(scheme) || rest.is_empty() {
            return Err(invalid());
        }
        if let Some(hier) = rest.strip_prefix("//") {
            let end = hier.find(['/', '?', '#']).unwrap_or(hier.len());
            let authority = &hier[..end];
            if authority.is_empty() && !scheme.eq_ignore_ascii_case("file") {
                return Err(invalid());
            }
            if !valid_authority(authority) {
                return Err(invalid());
            }
        }
        Ok(Url {
            raw: raw.to_string(),
            scheme_len: scheme.len(),
        })
    }

    /// The full URL text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Scheme, as written.
    pub fn scheme(&self) -> &str {
        &self.raw[..self.scheme_len]
    }

    /// Host part of a hierarchical URL.
    pub fn host(&self) -> Option<&str> {
        let hier = self.raw[self.scheme_len + 1..].strip_prefix("//")?;
        let end = hier.find(['/', '?', '#']).unwrap_or(hier.len());
        let authority = &hier[..end];
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = if host_port.starts_with('[') {
            host_port.split_once(']').map_or(host_port, |(h, _)| &h[1..])
        } else {
            host_port.split_once(':').map_or(host_port, |(h, _)| h)
        };
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }
}

fn valid_authority(authority: &str) -> bool {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let port = if let Some(v6) = host_port.strip_prefix('[') {
        match v6.split_once(']') {
            Some((_, after)) => after.strip_prefix(':'),
            None => return false,
        }
    } else {
        host_port.split_once(':').map(|(_, p)| p)
    };
    match port {
        None => true,
        Some(p) => !p.is_empty() && p.parse::<u16>().is_ok(),
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Url {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
    }
}

// ============================================================================
// Color
// ============================================================================

/// A 24-bit RGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Largest representable color.
    pub const MAX: u32 = 0x00ff_ffff;

    /// Build from a packed RGB value.
    pub fn from_rgb(rgb: u32) -> SchemaResult<Color> {
        if rgb > Self::MAX {
            return Err(SchemaError::invalid_value(PrimitiveKind::Color, rgb));
        }
        Ok(Color(rgb))
    }

    /// Parse `#rrggbb`, `0xrrggbb` or a decimal number.
    ///
    /// The `#` form takes exactly six hex digits; short CSS forms such as
    /// `#abc` are rejected.
    pub fn parse(s: &str) -> SchemaResult<Color> {
        let trimmed = s.trim();
        let parsed = if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(SchemaError::invalid_value(PrimitiveKind::Color, s));
            }
            u32::from_str_radix(hex, 16)
        } else if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            u32::from_str_radix(hex, 16)
        } else {
            trimmed.parse::<u32>()
        };
        match parsed {
            Ok(rgb) if rgb <= Self::MAX => Ok(Color(rgb)),
            _ => Err(SchemaError::invalid_value(PrimitiveKind::Color, s)),
        }
    }

    /// Packed RGB value.
    pub const fn rgb(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

// ============================================================================
// TimeZone
// ============================================================================

/// A time zone: `UTC`/`GMT`/`Z`, a fixed offset `±HH:MM`, or a region id
/// such as `Europe/Madrid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZone(String);

impl TimeZone {
    /// Parse and validate a zone.
    pub fn parse(s: &str) -> SchemaResult<TimeZone> {
        let trimmed = s.trim();
        let valid = matches!(trimmed, "UTC" | "GMT" | "Z")
            || parse_offset(trimmed).is_some()
            || ZONE_ID.is_match(trimmed);
        if !valid {
            return Err(SchemaError::invalid_value(PrimitiveKind::TimeZone, s));
        }
        Ok(TimeZone(trimmed.to_string()))
    }

    /// The zone id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Offset of a fixed zone; `None` for region ids.
    pub fn fixed_offset(&self) -> Option<FixedOffset> {
        match self.0.as_str() {
            "UTC" | "GMT" | "Z" => FixedOffset::east_opt(0),
            other => parse_offset(other),
        }
    }

    /// True for `UTC`, `GMT`, `Z` and zero offsets.
    pub fn is_utc(&self) -> bool {
        self.fixed_offset().map_or(false, |o| o.local_minus_utc() == 0)
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (h, m) = rest.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeZone {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeZone::parse(s)
    }
}

// ============================================================================
// Xml
// ============================================================================

/// A well-formed XML document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Xml(String);

impl Xml {
    /// Check well-formedness: balanced elements, one root, quoted attributes.
    pub fn parse(s: &str) -> SchemaResult<Xml> {
        if !well_formed(s) {
            return Err(SchemaError::invalid_value(PrimitiveKind::Xml, abbreviate(s)));
        }
        Ok(Xml(s.to_string()))
    }

    /// Document text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Xml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn well_formed(doc: &str) -> bool {
    let mut stack: Vec<&str> = Vec::new();
    let mut roots = 0usize;
    let mut rest = doc;

    while let Some(open) = rest.find('<') {
        let text = &rest[..open];
        if stack.is_empty() && !text.trim().is_empty() {
            return false;
        }
        rest = &rest[open..];

        let skip = |rest: &str, terminator: &str| rest.find(terminator).map(|i| i + terminator.len());
        let consumed = if rest.starts_with("<?") {
            skip(rest, "?>")
        } else if rest.starts_with("<!--") {
            skip(rest, "-->")
        } else if rest.starts_with("<![CDATA[") {
            if stack.is_empty() {
                return false;
            }
            skip(rest, "]]>")
        } else if rest.starts_with("<!") {
            if roots > 0 || !stack.is_empty() {
                return false;
            }
            skip(rest, ">")
        } else if let Some(body) = rest.strip_prefix("</") {
            let end = match body.find('>') {
                Some(end) => end,
                None => return false,
            };
            if stack.pop() != Some(body[..end].trim_end()) {
                return false;
            }
            Some(end + 3)
        } else {
            let end = match tag_end(rest) {
                Some(end) => end,
                None => return false,
            };
            let inner = &rest[1..end];
            let self_closing = inner.ends_with('/');
            let inner = inner.trim_end_matches('/');
            let name = inner
                .split(|c: char| c.is_whitespace())
                .next()
                .unwrap_or_default();
            if !valid_xml_name(name) {
                return false;
            }
            if stack.is_empty() {
                roots += 1;
                if roots > 1 {
                    return false;
                }
            }
            if !self_closing {
                stack.push(name);
            }
            Some(end + 1)
        };
        match consumed {
            Some(n) => rest = &rest[n..],
            None => return false,
        }
    }

    stack.is_empty() && roots == 1 && rest.trim().is_empty()
}

/// Offset of the `>` closing a start tag, skipping quoted attribute values.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '<') => return None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn valid_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

fn abbreviate(s: &str) -> String {
    const MAX: usize = 64;
    match s.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

// Scalars serialize as their canonical text.
macro_rules! serialize_as_text {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_text!(Email, Url, Color, TimeZone, Xml);

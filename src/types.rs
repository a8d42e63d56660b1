//! Scalar payload types carried by [`LlsdValue`](crate::LlsdValue).
//!
//! - [`Uuid`]: a 128-bit identifier, written as lower-case hyphenated hex
//! - [`Uri`]: an absolute or relative URI reference
//! - [`LlsdType`]: the discriminant of a value

use std::fmt;
use std::str::FromStr;

/// A 128-bit universally unique identifier.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::Uuid;
///
/// let id: Uuid = "6C2E0B4E-5A0B-4C52-9C6B-62B2A1F43F7D".parse().unwrap();
/// assert_eq!(id.to_string(), "6c2e0b4e-5a0b-4c52-9c6b-62b2a1f43f7d");
/// assert!(!id.is_nil());
/// assert!(Uuid::nil().is_nil());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Length of the canonical hyphenated text form.
    pub const TEXT_LEN: usize = 36;

    /// The all-zero identifier.
    #[inline]
    #[must_use]
    pub const fn nil() -> Self {
        Uuid([0; 16])
    }

    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Uuid(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Parses the hyphenated form, 32 bare hex digits, or either one in braces.
    ///
    /// Hex digits are case-insensitive. Returns `None` for anything else.
    #[must_use]
    pub fn parse_str(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(s);

        let bytes = s.as_bytes();
        let hex: Vec<u8> = match bytes.len() {
            32 => bytes.to_vec(),
            36 => {
                if [8, 13, 18, 23].iter().any(|&i| bytes[i] != b'-') {
                    return None;
                }
                bytes.iter().copied().filter(|b| *b != b'-').collect()
            }
            _ => return None,
        };
        if hex.len() != 32 {
            return None;
        }

        let mut out = [0u8; 16];
        for (i, pair) in hex.chunks_exact(2).enumerate() {
            out[i] = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
        }
        Some(Uuid(out))
    }
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for Uuid {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s).ok_or_else(|| crate::Error::custom(format!("invalid UUID: {:?}", s)))
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Uuid(bytes)
    }
}

/// An absolute or relative URI reference.
///
/// Absolute URIs are normalized on construction: the scheme and host are
/// lower-cased and an empty path after an authority becomes `/`. Relative
/// references are kept verbatim. The empty URI means "no URI".
///
/// # Examples
///
/// ```rust
/// use serde_llsd::Uri;
///
/// let abs = Uri::parse("HTTP://Example.COM").unwrap();
/// assert!(abs.is_absolute());
/// assert_eq!(abs.as_str(), "http://example.com/");
///
/// let rel = Uri::parse("../caps/seed").unwrap();
/// assert!(!rel.is_absolute());
/// assert_eq!(rel.as_str(), "../caps/seed");
///
/// assert!(Uri::parse("has space").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Uri(String);

impl Uri {
    /// Parses a URI reference, returning `None` for empty or malformed input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        let forbidden = |c: char| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
        };
        if input.chars().any(forbidden) {
            return None;
        }

        match scheme_len(input) {
            Some(len) => Some(Uri(normalize_absolute(input, len))),
            None => Some(Uri(input.to_string())),
        }
    }

    /// The URI meaning "no URI".
    #[must_use]
    pub fn empty() -> Self {
        Uri(String::new())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        scheme_len(&self.0).is_some()
    }
}

/// Length of a leading `scheme` when followed by `:`.
fn scheme_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')))?;
    (bytes[len] == b':').then_some(len)
}

fn normalize_absolute(input: &str, scheme_len: usize) -> String {
    let mut out = input[..scheme_len].to_ascii_lowercase();
    out.push(':');
    let rest = &input[scheme_len + 1..];

    let Some(hier) = rest.strip_prefix("//") else {
        out.push_str(rest);
        return out;
    };
    out.push_str("//");

    let authority_end = hier.find(['/', '?', '#']).unwrap_or(hier.len());
    let (authority, tail) = hier.split_at(authority_end);
    let (userinfo, hostport) = match authority.rfind('@') {
        Some(at) => authority.split_at(at + 1),
        None => ("", authority),
    };
    out.push_str(userinfo);
    let host_end = if hostport.starts_with('[') {
        hostport.find(']').map(|i| i + 1).unwrap_or(hostport.len())
    } else {
        hostport.find(':').unwrap_or(hostport.len())
    };
    out.push_str(&hostport[..host_end].to_ascii_lowercase());
    out.push_str(&hostport[host_end..]);

    if !tail.starts_with('/') && !authority.is_empty() {
        out.push('/');
    }
    out.push_str(tail);
    out
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The variant of an [`LlsdValue`](crate::LlsdValue).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LlsdType {
    Undefined,
    Boolean,
    Integer,
    Real,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Array,
    Map,
}

impl LlsdType {
    /// Element name used by the XML encoding.
    #[must_use]
    pub const fn xml_tag(self) -> &'static str {
        match self {
            LlsdType::Undefined => "undef",
            LlsdType::Boolean => "boolean",
            LlsdType::Integer => "integer",
            LlsdType::Real => "real",
            LlsdType::String => "string",
            LlsdType::Uuid => "uuid",
            LlsdType::Date => "date",
            LlsdType::Uri => "uri",
            LlsdType::Binary => "binary",
            LlsdType::Array => "array",
            LlsdType::Map => "map",
        }
    }
}

impl fmt::Display for LlsdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_tag())
    }
}

//! Configuration options for LLSD serialization and parsing.
//!
//! - [`DefaultsMode`]: whether default-valued map entries are written (JSON)
//! - [`JsonOptions`], [`XmlOptions`], [`NotationOptions`]: per-codec output knobs
//! - [`ParseOptions`]: bounds applied while parsing untrusted input
//!
//! ## Examples
//!
//! ```rust
//! use serde_llsd::{llsd, to_json_string, JsonOptions};
//!
//! let value = llsd!({ "visible": false, "count": 0, "name": "box" });
//!
//! let full = to_json_string(&value, &JsonOptions::new()).unwrap();
//! assert_eq!(full, r#"{"visible":false,"count":0,"name":"box"}"#);
//!
//! let compact = to_json_string(&value, &JsonOptions::omit_defaults()).unwrap();
//! assert_eq!(compact, r#"{"name":"box"}"#);
//! ```

/// Default bound on structural nesting for parsers and serializers.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Controls whether map entries holding their type's default are emitted.
///
/// `Omit` is lossy: a reader cannot tell an omitted key from an absent one.
/// It exists to shrink messages on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DefaultsMode {
    #[default]
    Preserve,
    Omit,
}

impl DefaultsMode {
    #[must_use]
    pub const fn preserves(self) -> bool {
        matches!(self, DefaultsMode::Preserve)
    }
}

/// Options for the JSON serializer.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{DefaultsMode, JsonOptions};
///
/// let options = JsonOptions::pretty().with_defaults(DefaultsMode::Omit);
/// assert!(options.pretty);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct JsonOptions {
    pub pretty: bool,
    pub indent: usize,
    pub defaults: DefaultsMode,
    pub max_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            pretty: false,
            indent: 4,
            defaults: DefaultsMode::Preserve,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonOptions {
    /// Compact output that keeps every map entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented, multi-line output.
    #[must_use]
    pub fn pretty() -> Self {
        JsonOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Compact output that drops default-valued map entries.
    #[must_use]
    pub fn omit_defaults() -> Self {
        JsonOptions {
            defaults: DefaultsMode::Omit,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: DefaultsMode) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options for the XML serializer.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlOptions {
    /// Prefix the document with `<?xml version="1.0" encoding="utf-8"?>`.
    pub declaration: bool,
    /// Write `\` as `&apos;`, matching older peers byte for byte.
    ///
    /// Such peers read the entity back as `'`, so backslashes do not survive
    /// a round trip while this is on.
    pub legacy_backslash_entity: bool,
    pub max_depth: usize,
}

impl Default for XmlOptions {
    fn default() -> Self {
        XmlOptions {
            declaration: true,
            legacy_backslash_entity: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl XmlOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    #[must_use]
    pub fn with_legacy_backslash_entity(mut self, legacy: bool) -> Self {
        self.legacy_backslash_entity = legacy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options for the Notation serializer.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::NotationOptions;
///
/// let options = NotationOptions::pretty().with_indent(4).with_header(true);
/// assert!(options.pretty && options.header);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NotationOptions {
    pub pretty: bool,
    pub indent: usize,
    /// Prefix the output with `<? llsd/notation ?>` and a newline.
    pub header: bool,
    pub max_depth: usize,
}

impl Default for NotationOptions {
    fn default() -> Self {
        NotationOptions {
            pretty: false,
            indent: 2,
            header: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl NotationOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pretty() -> Self {
        NotationOptions {
            pretty: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options shared by every parser.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Tracks nesting while walking a tree and fails once it passes `limit`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DepthGuard {
    depth: usize,
    limit: usize,
}

impl DepthGuard {
    pub(crate) fn new(limit: usize) -> Self {
        DepthGuard { depth: 0, limit }
    }

    pub(crate) fn enter(&mut self) -> crate::Result<()> {
        if self.depth >= self.limit {
            return Err(crate::Error::depth_limit(self.limit));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let json = JsonOptions::new();
        assert!(!json.pretty);
        assert_eq!(json.defaults, DefaultsMode::Preserve);
        assert_eq!(json.max_depth, DEFAULT_MAX_DEPTH);

        let xml = XmlOptions::new();
        assert!(xml.declaration);
        assert!(!xml.legacy_backslash_entity);

        assert_eq!(NotationOptions::new().indent, 2);
        assert!(DefaultsMode::Preserve.preserves());
        assert!(!DefaultsMode::Omit.preserves());
    }

    #[test]
    fn test_depth_guard() {
        let mut guard = DepthGuard::new(2);
        assert!(guard.enter().is_ok());
        assert!(guard.enter().is_ok());
        assert_eq!(guard.enter(), Err(crate::Error::DepthLimit { limit: 2 }));
        guard.leave();
        assert_eq!(guard.depth(), 1);
        assert!(guard.enter().is_ok());
    }
}

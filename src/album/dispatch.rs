use super::{AlbumMeta, FunkySouls, ParseError, FUNKYSOULS_ORIGIN};
use crate::feedly::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns one origin's entry titles into [`AlbumMeta`].
///
/// Implementations must be pure: the same title always yields the same
/// result and nothing is shared between calls.
pub trait TitleParser: Send + Sync {
    fn parse(&self, title: &str) -> Result<AlbumMeta, ParseError>;
}

impl<F> TitleParser for F
where
    F: Fn(&str) -> Result<AlbumMeta, ParseError> + Send + Sync,
{
    fn parse(&self, title: &str) -> Result<AlbumMeta, ParseError> {
        self(title)
    }
}

/// Maps origin URLs to the parser for that origin's titles.
///
/// Lookup is by exact string equality on the entry's origin URL; no
/// normalisation of case, scheme or trailing slash is applied.
#[derive(Clone, Default)]
pub struct OriginRegistry {
    parsers: HashMap<String, Arc<dyn TitleParser>>,
}

impl fmt::Debug for OriginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut origins: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        origins.sort_unstable();
        f.debug_struct("OriginRegistry")
            .field("origins", &origins)
            .finish()
    }
}

impl OriginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in origin.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FUNKYSOULS_ORIGIN, FunkySouls);
        registry
    }

    /// Adds or replaces the parser for `origin_url`.
    pub fn register(&mut self, origin_url: impl Into<String>, parser: impl TitleParser + 'static) {
        self.parsers.insert(origin_url.into(), Arc::new(parser));
    }

    pub fn supports(&self, origin_url: &str) -> bool {
        self.parsers.contains_key(origin_url)
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Parses `entry` with the parser registered for its origin.
    pub fn dispatch(&self, entry: &Entry) -> Result<AlbumMeta, ParseError> {
        let origin = &entry.origin;
        let parser = self
            .parsers
            .get(&origin.html_url)
            .ok_or_else(|| ParseError::UnsupportedOrigin {
                url: origin.html_url.clone(),
                title: origin.title.clone(),
            })?;
        parser.parse(&entry.title)
    }
}

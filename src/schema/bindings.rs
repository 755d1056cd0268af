//! Key-binding table — read-only configuration from the host's
//! control-binding layer, used to turn command tokens embedded in UI text
//! into speakable key names.

use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Map from command token (e.g. `CmdMoveN`) to the live-bound key name
/// (e.g. `Keypad 8`).
///
/// Tokens are bare identifiers, so one token may be a prefix of another;
/// substitution order is kept longest-first to avoid partial-prefix
/// collisions. Key names must not themselves contain binding tokens, or
/// substitution would no longer be idempotent.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    bindings: FxHashMap<String, String>,
    /// Tokens sorted by length descending, rebuilt on every mutation.
    order: Vec<String>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: FxHashMap<String, String>) -> Self {
        let mut bindings = Self {
            bindings: map,
            order: Vec::new(),
        };
        bindings.rebuild_order();
        bindings
    }

    pub fn bind(&mut self, token: &str, key_name: &str) {
        self.bindings.insert(token.to_string(), key_name.to_string());
        self.rebuild_order();
    }

    pub fn key_for(&self, token: &str) -> Option<&str> {
        self.bindings.get(token).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Tokens in substitution order: longest first, ties alphabetical for
    /// determinism.
    pub fn tokens_longest_first(&self) -> &[String] {
        &self.order
    }

    /// Parse a binding table from a RON map literal, e.g.
    /// `{ "CmdMoveN": "Keypad 8" }`.
    pub fn parse_ron(contents: &str) -> Result<Self, BindingsError> {
        let map: FxHashMap<String, String> = ron::from_str(contents)?;
        Ok(Self::from_map(map))
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, BindingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    fn rebuild_order(&mut self) {
        self.order = self.bindings.keys().cloned().collect();
        self.order
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }
}

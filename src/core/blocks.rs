//! Content-block navigation — the provider chain behind "read the current
//! screen", one titled chunk at a time.

use log::debug;
use serde::{Deserialize, Serialize};

/// A titled chunk of screen-summary text. Navigation order matters, so
/// blocks travel as ordered sequences, never sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ContentBlock {
    pub fn titled(title: &str, body: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
        }
    }

    pub fn body_only(body: &str) -> Self {
        Self {
            title: None,
            body: Some(body.to_string()),
        }
    }

    /// Speakable form: `"title: body"`, or whichever half is present.
    pub fn speakable(&self) -> Option<String> {
        match (&self.title, &self.body) {
            (Some(title), Some(body)) => Some(format!("{}: {}", title, body)),
            (Some(title), None) => Some(title.clone()),
            (None, Some(body)) => Some(body.clone()),
            (None, None) => None,
        }
    }
}

/// A capability supplying the current block sequence for whatever screen is
/// active. `None` means "my screen is gone" and triggers deregistration;
/// `Some(vec![])` means "active but nothing to say right now" and must NOT
/// fall through to a lower tier.
pub type ProviderFn = Box<dyn Fn() -> Option<Vec<ContentBlock>>>;

/// Three-tier provider resolution: (1) the registered screen provider,
/// (2) a static last-set block list, (3) a default provider. Only tier 1
/// auto-clears on unavailability.
#[derive(Default)]
pub struct ContentBlockRegistry {
    provider: Option<ProviderFn>,
    static_blocks: Option<Vec<ContentBlock>>,
    default_provider: Option<ProviderFn>,
    /// Unset until the first navigation press after a provider change, so
    /// that press always lands on the first block, never a stale index.
    index: Option<usize>,
}

impl ContentBlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_provider(&mut self, provider: ProviderFn) {
        self.provider = Some(provider);
        self.index = None;
    }

    pub fn clear_provider(&mut self) {
        if self.provider.take().is_some() {
            self.index = None;
        }
    }

    /// One-shot content fixed at screen-open time (tier 2).
    pub fn set_static_blocks(&mut self, blocks: Vec<ContentBlock>) {
        self.static_blocks = Some(blocks);
        self.index = None;
    }

    /// Installed once at startup (tier 3).
    pub fn set_default_provider(&mut self, provider: ProviderFn) {
        self.default_provider = Some(provider);
    }

    /// Walk the precedence chain and return the block one step in
    /// `direction` from the current one, wrapping in both directions.
    /// Returns `None` when every tier yields zero blocks.
    pub fn resolve_for_navigation(&mut self, direction: i32) -> Option<ContentBlock> {
        let blocks = self.current_blocks()?;
        if blocks.is_empty() {
            return None;
        }
        let count = blocks.len() as i32;
        let next = match self.index {
            None => 0,
            Some(i) => (i as i32 + direction).rem_euclid(count) as usize,
        };
        self.index = Some(next);
        Some(blocks[next].clone())
    }

    fn current_blocks(&mut self) -> Option<Vec<ContentBlock>> {
        if let Some(provider) = &self.provider {
            if let Some(blocks) = provider() {
                return Some(blocks);
            }
            // the provider's screen is gone
            self.provider = None;
            self.index = None;
            debug!("content provider reported unavailable, deregistered");
        }
        if let Some(blocks) = &self.static_blocks {
            return Some(blocks.clone());
        }
        self.default_provider.as_ref().and_then(|p| p())
    }
}

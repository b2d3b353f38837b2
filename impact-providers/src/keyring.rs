//! Ordered credentials for one provider.
//!
//! A ring is built once from configuration and never mutated. Each fetch
//! walks it with a fresh [`KeyCursor`], so concurrent requests never share
//! iteration state.

use std::fmt;

use tracing::info;

/// Marker that unfilled configuration templates put into key slots.
pub const PLACEHOLDER_MARKER: &str = "PLACEHOLDER";

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderKey {
    value: String,
    is_placeholder: bool,
}

impl ProviderKey {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_placeholder = value.trim().is_empty() || value.contains(PLACEHOLDER_MARKER);
        Self {
            value,
            is_placeholder,
        }
    }

    /// Credential value, for building request URLs or headers.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }
}

impl fmt::Debug for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderKey")
            .field("value", &"<redacted>")
            .field("is_placeholder", &self.is_placeholder)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderKeyRing {
    provider: String,
    keys: Vec<ProviderKey>,
}

impl ProviderKeyRing {
    pub fn new<I, S>(provider: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider: provider.to_string(),
            keys: keys.into_iter().map(ProviderKey::new).collect(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[ProviderKey] {
        &self.keys
    }

    pub fn usable_count(&self) -> usize {
        self.keys.iter().filter(|k| !k.is_placeholder()).count()
    }

    pub fn cursor(&self) -> KeyCursor<'_> {
        KeyCursor {
            ring: self,
            position: 0,
        }
    }
}

/// Walks a ring in configured order, skipping placeholders.
#[derive(Debug, Clone)]
pub struct KeyCursor<'a> {
    ring: &'a ProviderKeyRing,
    position: usize,
}

impl<'a> KeyCursor<'a> {
    /// Next non-placeholder key and its index in the ring. `None` once the
    /// ring is exhausted.
    pub fn next_usable(&mut self) -> Option<(usize, &'a ProviderKey)> {
        while let Some(key) = self.ring.keys.get(self.position) {
            let index = self.position;
            self.position += 1;
            if key.is_placeholder() {
                info!(
                    provider = %self.ring.provider,
                    key_index = index,
                    "skipping placeholder key"
                );
                continue;
            }
            return Some((index, key));
        }
        None
    }
}

impl<'a> Iterator for KeyCursor<'a> {
    type Item = (usize, &'a ProviderKey);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_usable()
    }
}

//! Font library: maps font roles to font files and hands out raw bytes.
//!
//! Fonts are optional at runtime. A missing file is a compatibility warning,
//! logged once per role; the PNG backend then skips the affected text runs
//! while the markup backends keep referencing the family by name.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::scene::FontRole;

pub struct FontLibrary {
    root: PathBuf,
    cache: HashMap<FontRole, Option<Arc<Vec<u8>>>>,
}

impl FontLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn file_name(role: FontRole) -> &'static str {
        match role {
            FontRole::Heading => "Oswald-VariableFont_wght.ttf",
            FontRole::Display => "BungeeInline-Regular.ttf",
            FontRole::Script => "Yellowtail-Regular.ttf",
        }
    }

    /// Family name used by the markup backends, where fonts resolve on the
    /// viewer's side.
    pub fn family_name(role: FontRole) -> &'static str {
        match role {
            FontRole::Heading => "Oswald",
            FontRole::Display => "Bungee Inline",
            FontRole::Script => "Yellowtail",
        }
    }

    /// Load the font bytes for a role, caching the result. Returns `None`
    /// (after a single warning) when the file is absent or unreadable.
    pub fn load(&mut self, role: FontRole) -> Option<Arc<Vec<u8>>> {
        if let Some(cached) = self.cache.get(&role) {
            return cached.clone();
        }

        let path = self.root.join(Self::file_name(role));
        let loaded = match std::fs::read(&path) {
            Ok(bytes) => Some(Arc::new(bytes)),
            Err(err) => {
                tracing::warn!(
                    font = Self::file_name(role),
                    path = %path.display(),
                    error = %err,
                    "font file unavailable, text runs for this role will be skipped"
                );
                None
            }
        };
        self.cache.insert(role, loaded.clone());
        loaded
    }
}

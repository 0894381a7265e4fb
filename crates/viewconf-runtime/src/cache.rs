use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use viewconf_types::{CustomizationId, UserId};

use crate::ViewResult;

/// Identifies one rendering of a customization.
///
/// `user` is set only when the rendering depends on the user's column
/// preferences; `level` shapes the field map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewCacheKey {
    pub model: String,
    pub customization: CustomizationId,
    pub user: Option<UserId>,
    pub level: u32,
}

/// Rendered customized views.
///
/// Invalidation is all-or-nothing: any change to a customization clears
/// every entry.
pub struct ViewCache {
    enabled: bool,
    entries: Mutex<HashMap<ViewCacheKey, ViewResult>>,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self {
            enabled: true,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, key: &ViewCacheKey) -> Option<ViewResult> {
        let entries = self.lock();
        let hit = entries.get(key).cloned();
        tracing::debug!(
            model = %key.model,
            customization = %key.customization,
            hit = hit.is_some(),
            "view cache lookup"
        );
        hit
    }

    pub fn put(&self, key: ViewCacheKey, result: ViewResult) {
        if !self.enabled {
            return;
        }
        self.lock().insert(key, result);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.lock();
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "view cache cleared");
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry
    fn lock(&self) -> MutexGuard<'_, HashMap<ViewCacheKey, ViewResult>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::document::Document;
use crate::types::ScrapeError;

type Slot = Arc<OnceCell<Arc<Document>>>;

/// Parsed documents keyed by source URL.
///
/// Entries are never evicted or invalidated, so memory grows with the number
/// of distinct URLs seen by one extractor. Each URL has its own cell: callers
/// racing on the same URL wait for a single fetch, different URLs do not block
/// each other. A failed fetch leaves the cell empty and is retried next time.
#[derive(Debug, Default)]
pub struct DocumentCache {
    enabled: bool,
    slots: Mutex<HashMap<String, Slot>>,
}

impl DocumentCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> Result<Arc<Document>, ScrapeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Document, ScrapeError>>,
    {
        if !self.enabled {
            return fetch().await.map(Arc::new);
        }

        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(url.to_string()).or_default().clone()
        };
        let document = slot
            .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(document))
    }

    /// Number of URLs with a stored document.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

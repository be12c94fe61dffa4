//! In-process normalizer: canonical spacing and case, memoized per key.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::{AddressError, AddressNormalizer, AddressRecord, CacheStats};
use crate::extract::normalize_text;

/// Normalizes addresses locally and caches the results for the life of the
/// value.
///
/// Output is `"<ADDRESS>, <CITY> <ZIP>"`, upper-cased with single spaces.
#[derive(Debug, Default)]
pub struct MemoryNormalizer {
    cache: Mutex<HashMap<String, String>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl MemoryNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(record: &AddressRecord) -> String {
        let mut text = normalize_text(&record.address).to_uppercase();
        if let Some(city) = record.city.as_deref().map(normalize_text).filter(|c| !c.is_empty()) {
            text.push_str(", ");
            text.push_str(&city.to_uppercase());
        }
        if let Some(zip) = record.zip.as_deref().map(str::trim).filter(|z| !z.is_empty()) {
            text.push(' ');
            text.push_str(zip);
        }
        text
    }
}

#[async_trait]
impl AddressNormalizer for MemoryNormalizer {
    fn name(&self) -> &str {
        "memory"
    }

    async fn normalize_batch(
        &self,
        records: &[AddressRecord],
    ) -> Result<HashMap<String, String>, AddressError> {
        let mut cache = self.cache.lock().map_err(|_| AddressError::Backend {
            backend: self.name().to_string(),
            message: "cache lock poisoned".to_string(),
        })?;

        let mut out = HashMap::with_capacity(records.len());
        for record in records {
            let key = record.key();
            if let Some(cached) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::SeqCst);
                out.insert(key, cached.clone());
                continue;
            }
            self.misses.fetch_add(1, Ordering::SeqCst);
            let normalized = Self::normalize(record);
            cache.insert(key.clone(), normalized.clone());
            out.insert(key, normalized);
        }
        debug!(batch = records.len(), cache_size = cache.len(), "normalized batch");
        Ok(out)
    }

    fn cache_stats(&self) -> CacheStats {
        let size = self.cache.lock().map_or(0, |cache| cache.len());
        CacheStats {
            size,
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
        }
    }
}

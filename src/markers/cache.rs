use std::sync::Arc;

use super::icon::{Icon, IconFetcher};
use crate::{
    prelude::{HashMap, HashSet},
    Result,
};

/// Cache statistics for one apply pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub failures: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Icon memoization scoped to a single marker apply pass.
///
/// A failed fetch is remembered as `None` so that duplicate URIs in the same
/// batch do not retry it; the next pass starts from an empty cache.
pub struct IconCache<'a> {
    fetcher: &'a dyn IconFetcher,
    parallelism: usize,
    entries: HashMap<String, Option<Arc<Icon>>>,
    stats: CacheStats,
}

impl<'a> IconCache<'a> {
    pub fn new(fetcher: &'a dyn IconFetcher, parallelism: usize) -> Self {
        Self {
            fetcher,
            parallelism: parallelism.max(1),
            entries: HashMap::default(),
            stats: CacheStats::default(),
        }
    }

    /// Fetch straight from the collaborator, bypassing the cache
    pub fn fetch(&self, uri: &str) -> Result<Icon> {
        self.fetcher.fetch(uri)
    }

    /// Resolve `uri`, fetching on a miss. `None` means the icon could not be
    /// fetched and the caller should fall back to the default marker.
    pub fn resolve(&mut self, uri: &str) -> Option<Arc<Icon>> {
        if let Some(entry) = self.entries.get(uri) {
            self.stats.hits += 1;
            return entry.clone();
        }

        let result = self.fetch(uri);
        self.store(uri, result)
    }

    /// Fetch every URI not yet cached, running up to `parallelism` fetches at
    /// once. Duplicates are fetched once. Later `resolve` calls for these
    /// URIs are hits.
    pub fn prefetch<'u, I>(&mut self, uris: I)
    where
        I: IntoIterator<Item = &'u str>,
    {
        let mut seen = HashSet::default();
        let pending: Vec<&'u str> = uris
            .into_iter()
            .filter(|uri| !self.entries.contains_key(*uri) && seen.insert(*uri))
            .collect();

        if pending.is_empty() {
            return;
        }

        let workers = self.parallelism.min(pending.len());
        if workers == 1 {
            for uri in pending {
                let result = self.fetch(uri);
                self.store(uri, result);
            }
            return;
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<&'u str>();
        for uri in &pending {
            let _ = job_tx.send(*uri);
        }
        drop(job_tx);

        let fetcher = self.fetcher;
        let mut fetched: HashMap<&'u str, Result<Icon>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    scope.spawn(move || {
                        job_rx
                            .iter()
                            .map(|uri| (uri, fetcher.fetch(uri)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .flatten()
                .collect()
        });

        // Insert in submission order so stats and logs do not depend on
        // which worker finished first.
        for uri in pending {
            match fetched.remove(uri) {
                Some(result) => {
                    self.store(uri, result);
                }
                None => log::warn!("icon fetch worker for {} did not report back", uri),
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&mut self, uri: &str, result: Result<Icon>) -> Option<Arc<Icon>> {
        self.stats.misses += 1;
        let entry = match result {
            Ok(icon) => Some(Arc::new(icon)),
            Err(e) => {
                self.stats.failures += 1;
                log::warn!("icon {} unavailable, using default marker: {}", uri, e);
                None
            }
        };
        self.entries.insert(uri.to_string(), entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BridgeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl IconFetcher for CountingFetcher {
        fn fetch(&self, uri: &str) -> Result<Icon> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if uri.contains("broken") {
                return Err(BridgeError::IconFetchFailed {
                    uri: uri.to_string(),
                    reason: "HTTP 404".to_string(),
                });
            }
            Ok(Icon::new(1, 1, vec![0, 0, 0, 255]))
        }
    }

    fn fetcher() -> CountingFetcher {
        CountingFetcher {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_resolve_memoizes() {
        let fetcher = fetcher();
        let mut cache = IconCache::new(&fetcher, 1);

        let first = cache.resolve("https://cdn.example/pin.png").unwrap();
        let second = cache.resolve("https://cdn.example/pin.png").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_failure_is_remembered() {
        let fetcher = fetcher();
        let mut cache = IconCache::new(&fetcher, 1);

        assert!(cache.resolve("https://cdn.example/broken.png").is_none());
        assert!(cache.resolve("https://cdn.example/broken.png").is_none());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().failures, 1);
    }

    #[test]
    fn test_prefetch_dedupes_concurrently() {
        let fetcher = fetcher();
        let mut cache = IconCache::new(&fetcher, 4);
        let uris = [
            "https://cdn.example/a.png",
            "https://cdn.example/b.png",
            "https://cdn.example/a.png",
            "https://cdn.example/broken.png",
            "https://cdn.example/c.png",
        ];

        cache.prefetch(uris.iter().copied());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(), 4);

        for uri in uris {
            let _ = cache.resolve(uri);
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert!(cache.resolve("https://cdn.example/broken.png").is_none());
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |_: &str| -> Result<Icon> { Ok(Icon::new(2, 2, vec![255; 16])) };
        let mut cache = IconCache::new(&fetcher, 2);
        assert_eq!(cache.resolve("file:///pin.png").unwrap().size(), (2, 2));
    }
}

// src/app/thumbnail.rs
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::app::cache::ThumbnailCache;
use crate::app::prefetch::{FetchResult, ThumbnailPool};

/// `{media_base}/{id}.webp`
pub fn thumbnail_url(media_base: &str, id: i64) -> String {
    format!("{media_base}/{id}.webp")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Loading,
    Resolved { url: String },
    Error { message: String },
}

/// Resolves video ids to thumbnail URLs that are known to load.
#[derive(Clone)]
pub struct ThumbnailResolver {
    media_base: String,
    cache: ThumbnailCache,
    pool: Arc<ThumbnailPool>,
}

impl ThumbnailResolver {
    pub fn new(media_base: impl Into<String>, cache: ThumbnailCache, pool: Arc<ThumbnailPool>) -> Self {
        Self {
            media_base: media_base.into(),
            cache,
            pool,
        }
    }

    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    pub fn url_for(&self, id: i64) -> String {
        thumbnail_url(&self.media_base, id)
    }

    /// Cache hit: resolved right away, no probe. Otherwise a probe is queued.
    ///
    /// `title` is accepted alongside the id but does not take part in the URL
    /// or the cache key; an edited title keeps serving the cached URL.
    pub fn resolve(&self, id: i64, _title: &str) -> ResolveHandle {
        if let Some(url) = self.cache.get(id) {
            debug!("thumbnail cache hit for video {id}");
            return ResolveHandle::done(id, ThumbnailStatus::Resolved { url }, self.cache.clone());
        }

        let url = self.url_for(id);
        let pending = self.pool.submit(url.clone());
        ResolveHandle {
            id,
            url,
            cache: self.cache.clone(),
            pending: Some(pending),
            status: ThumbnailStatus::Loading,
            pixels: None,
        }
    }

    /// `resolve` run to completion on the calling thread.
    pub fn resolve_blocking(&self, id: i64, _title: &str) -> ThumbnailStatus {
        if let Some(url) = self.cache.get(id) {
            return ThumbnailStatus::Resolved { url };
        }
        let url = self.url_for(id);
        let mut handle = ResolveHandle::done(id, ThumbnailStatus::Loading, self.cache.clone());
        handle.url = url.clone();
        handle.settle(self.pool.fetch_blocking(&url));
        handle.status
    }

    /// Plain image load for an already resolved URL (display step).
    pub fn load(&self, url: &str) -> Receiver<FetchResult> {
        self.pool.submit(url.to_string())
    }
}

/// One in-flight resolution. Dropping it detaches the probe: the outcome is
/// discarded and the cache is left untouched.
pub struct ResolveHandle {
    id: i64,
    url: String,
    cache: ThumbnailCache,
    pending: Option<Receiver<FetchResult>>,
    status: ThumbnailStatus,
    pixels: Option<RgbaImage>,
}

impl ResolveHandle {
    fn done(id: i64, status: ThumbnailStatus, cache: ThumbnailCache) -> Self {
        let url = match &status {
            ThumbnailStatus::Resolved { url } => url.clone(),
            _ => String::new(),
        };
        Self {
            id,
            url,
            cache,
            pending: None,
            status,
            pixels: None,
        }
    }

    pub fn video_id(&self) -> i64 {
        self.id
    }

    pub fn status(&self) -> &ThumbnailStatus {
        &self.status
    }

    /// Non-blocking; applies the probe outcome once it has arrived.
    pub fn poll(&mut self) -> &ThumbnailStatus {
        if let Some(rx) = &self.pending {
            match rx.try_recv() {
                Ok(result) => self.settle(result),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.settle(Err(crate::error::ThumbnailError::PoolClosed))
                }
            }
        }
        &self.status
    }

    /// Blocks up to `timeout` for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> &ThumbnailStatus {
        if let Some(rx) = &self.pending {
            match rx.recv_timeout(timeout) {
                Ok(result) => self.settle(result),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.settle(Err(crate::error::ThumbnailError::PoolClosed))
                }
            }
        }
        &self.status
    }

    /// Pixels decoded by a fresh probe, if any. Cache hits carry none.
    pub fn take_pixels(&mut self) -> Option<RgbaImage> {
        self.pixels.take()
    }

    fn settle(&mut self, result: FetchResult) {
        self.pending = None;
        match result {
            Ok(img) => {
                self.cache.insert(self.id, self.url.clone());
                self.pixels = Some(img);
                self.status = ThumbnailStatus::Resolved {
                    url: self.url.clone(),
                };
            }
            Err(e) => {
                warn!("Could not load the thumbnail for video {}: {e}", self.id);
                self.status = ThumbnailStatus::Error {
                    message: e.to_string(),
                };
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::cache::ThumbnailSource;
    use crate::error::ThumbnailError;
    use image::Rgba;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Counts fetches; URLs listed in `failing` answer 404.
    #[derive(Default)]
    pub(crate) struct CountingSource {
        pub(crate) calls: AtomicUsize,
        pub(crate) failing: Mutex<HashSet<String>>,
    }

    impl CountingSource {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn fail(&self, url: &str) {
            self.failing.lock().unwrap().insert(url.to_string());
        }

        pub(crate) fn heal(&self, url: &str) {
            self.failing.lock().unwrap().remove(url);
        }
    }

    impl ThumbnailSource for CountingSource {
        fn fetch(&self, url: &str) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().unwrap().contains(url) {
                return Err(ThumbnailError::Status { url: url.to_string(), code: 404 });
            }
            Ok(RgbaImage::from_pixel(16, 9, Rgba([10, 20, 30, 255])))
        }
    }

    pub(crate) fn resolver_with(source: Arc<CountingSource>) -> ThumbnailResolver {
        let pool = Arc::new(ThumbnailPool::start(source, 2));
        ThumbnailResolver::new("http://media.test/media", ThumbnailCache::new(), pool)
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn url_is_a_function_of_id_only() {
        assert_eq!(thumbnail_url("http://h/media", 12), "http://h/media/12.webp");
    }

    #[test]
    fn second_resolution_is_served_from_cache() {
        let source = Arc::new(CountingSource::default());
        let resolver = resolver_with(source.clone());

        let mut first = resolver.resolve(1, "A");
        assert_eq!(first.status(), &ThumbnailStatus::Loading);
        let url = "http://media.test/media/1.webp".to_string();
        assert_eq!(first.wait(WAIT), &ThumbnailStatus::Resolved { url: url.clone() });
        assert!(first.take_pixels().is_some());
        assert_eq!(resolver.cache().get(1), Some(url.clone()));

        let mut second = resolver.resolve(1, "A renamed");
        assert_eq!(second.poll(), &ThumbnailStatus::Resolved { url });
        assert!(second.take_pixels().is_none());
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn failures_are_not_cached_and_are_retried() {
        let source = Arc::new(CountingSource::default());
        source.fail("http://media.test/media/2.webp");
        let resolver = resolver_with(source.clone());

        let mut first = resolver.resolve(2, "B");
        assert!(matches!(first.wait(WAIT), ThumbnailStatus::Error { .. }));
        assert!(!resolver.cache().contains(2));

        source.heal("http://media.test/media/2.webp");
        let mut again = resolver.resolve(2, "B");
        assert!(matches!(again.wait(WAIT), ThumbnailStatus::Resolved { .. }));
        assert_eq!(source.calls(), 2);
        assert!(resolver.cache().contains(2));
    }

    #[test]
    fn detached_probe_leaves_cache_untouched() {
        let source = Arc::new(CountingSource::default());
        let resolver = resolver_with(source.clone());

        drop(resolver.resolve(3, "C"));
        // let the worker finish the orphaned job
        let mut probe = resolver.resolve(4, "D");
        probe.wait(WAIT);
        std::thread::sleep(Duration::from_millis(50));

        assert!(!resolver.cache().contains(3));
        assert!(resolver.cache().contains(4));
    }

    #[test]
    fn concurrent_mounts_each_probe() {
        let source = Arc::new(CountingSource::default());
        let resolver = resolver_with(source.clone());

        let mut a = resolver.resolve(5, "E");
        let mut b = resolver.resolve(5, "E");
        a.wait(WAIT);
        b.wait(WAIT);
        assert_eq!(source.calls(), 2);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn blocking_resolution_matches_async_one() {
        let source = Arc::new(CountingSource::default());
        source.fail("http://media.test/media/8.webp");
        let resolver = resolver_with(source.clone());

        assert_eq!(
            resolver.resolve_blocking(7, "G"),
            ThumbnailStatus::Resolved { url: "http://media.test/media/7.webp".into() }
        );
        assert!(matches!(resolver.resolve_blocking(8, "H"), ThumbnailStatus::Error { .. }));
        assert!(!resolver.cache().contains(8));
        resolver.resolve_blocking(7, "G");
        assert_eq!(source.calls(), 2);
    }
}

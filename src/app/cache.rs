use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use image::RgbaImage;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::ThumbnailError;

/// Session-wide map of video id to a thumbnail URL that is known to load.
///
/// Built once at startup and handed to consumers by cloning the handle. Entries
/// are only added after a successful load and are never evicted; failed ids are
/// never recorded, so the next mount probes them again.
#[derive(Clone, Debug, Default)]
pub struct ThumbnailCache {
    inner: Arc<RwLock<HashMap<i64, String>>>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: i64) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Records a confirmed URL. The same id always maps to the same URL, so a
    /// racing second writer just stores an identical value.
    pub fn insert(&self, id: i64, url: String) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.insert(id, url).is_none() {
            debug!("thumbnail cache: stored video {id} ({} entries)", map.len());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Something that can turn a thumbnail URL into pixels.
pub trait ThumbnailSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<RgbaImage, ThumbnailError>;
}

/// GET + decode through `reqwest` and `image`. The client is built lazily on
/// first use and shared by every worker.
pub struct HttpThumbnailSource {
    client: OnceCell<Client>,
    timeout: Duration,
}

impl HttpThumbnailSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
        }
    }

    fn client(&self, url: &str) -> Result<&Client, ThumbnailError> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .user_agent("protube/thumbnails")
                .timeout(self.timeout)
                .pool_max_idle_per_host(16)
                .default_headers({
                    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                    let mut h = HeaderMap::new();
                    h.insert(
                        ACCEPT,
                        HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                    );
                    h
                })
                .build()
                .map_err(|e| ThumbnailError::Request {
                    url: url.to_string(),
                    reason: format!("http client: {e}"),
                })
        })
    }
}

impl Default for HttpThumbnailSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

impl ThumbnailSource for HttpThumbnailSource {
    fn fetch(&self, url: &str) -> Result<RgbaImage, ThumbnailError> {
        let resp = self
            .client(url)?
            .get(url)
            .send()
            .map_err(|e| ThumbnailError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(ThumbnailError::Status {
                url: url.to_string(),
                code: resp.status().as_u16(),
            });
        }
        let body = resp.bytes().map_err(|e| ThumbnailError::Request {
            url: url.to_string(),
            reason: format!("read body: {e}"),
        })?;

        decode_thumbnail(url, &body)
    }
}

pub fn decode_thumbnail(url: &str, bytes: &[u8]) -> Result<RgbaImage, ThumbnailError> {
    let img = image::load_from_memory(bytes).map_err(|e| ThumbnailError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ThumbnailError::Empty {
            url: url.to_string(),
        });
    }
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{png_bytes, StubServer};

    #[test]
    fn cache_is_shared_between_clones() {
        let cache = ThumbnailCache::new();
        let other = cache.clone();
        other.insert(4, "http://m/4.webp".into());
        assert_eq!(cache.get(4).as_deref(), Some("http://m/4.webp"));
        assert!(cache.contains(4));
        assert_eq!(cache.len(), 1);

        // idempotent rewrite
        cache.insert(4, "http://m/4.webp".into());
        assert_eq!(other.len(), 1);

        cache.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn http_source_decodes_images() {
        let server = StubServer::serve(1, "200 OK", "image/png", png_bytes(8, 6));
        let source = HttpThumbnailSource::new(Duration::from_secs(5));
        let img = source.fetch(&format!("{}/media/1.webp", server.base_url())).unwrap();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(server.request_lines(), vec!["GET /media/1.webp HTTP/1.1".to_string()]);
    }

    #[test]
    fn http_source_reports_status_and_decode_errors() {
        let server = StubServer::serve(1, "404 Not Found", "text/plain", b"nope".to_vec());
        let source = HttpThumbnailSource::new(Duration::from_secs(5));
        let url = format!("{}/media/2.webp", server.base_url());
        assert_eq!(
            source.fetch(&url),
            Err(ThumbnailError::Status { url: url.clone(), code: 404 })
        );

        let err = decode_thumbnail("x", b"definitely not an image").unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode { .. }));
    }
}

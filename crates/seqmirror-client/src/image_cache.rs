/// The most recently admitted image plus the parameters it was fetched with.
#[derive(Debug, Clone)]
struct CachedImage {
    index: u32,
    quality: u8,
    scale: f64,
    image: String,
}

/// Single-slot memo for the last fetched sequence image.
///
/// A cached entry satisfies a request only for the same image index at
/// equal-or-better quality and scale, so a higher-quality fetch keeps serving
/// cheaper requests. The slot is overwritten wholesale on every admitted
/// fetch.
#[derive(Debug, Default)]
pub struct ImageCache {
    slot: Option<CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached image when it satisfies the request.
    pub fn lookup(&self, index: u32, quality: u8, scale: f64) -> Option<&str> {
        self.slot
            .as_ref()
            .filter(|c| c.index == index && quality <= c.quality && scale <= c.scale)
            .map(|c| c.image.as_str())
    }

    /// Replaces the slot with a freshly fetched image.
    pub fn store(&mut self, index: u32, quality: u8, scale: f64, image: String) {
        self.slot = Some(CachedImage {
            index,
            quality,
            scale,
            image,
        });
    }
}

/// Wraps the raw base64 payload the way consumers embed it.
pub fn as_data_url(base64: &str) -> String {
    format!("data:image/jpeg;base64,{base64}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_index_lower_quality_hits() {
        let mut cache = ImageCache::new();
        cache.store(3, 90, 1.0, "img".into());
        assert_eq!(cache.lookup(3, 80, 1.0), Some("img"));
        assert_eq!(cache.lookup(3, 90, 1.0), Some("img"));
    }

    #[test]
    fn higher_quality_or_scale_misses() {
        let mut cache = ImageCache::new();
        cache.store(3, 90, 1.0, "img".into());
        assert_eq!(cache.lookup(3, 95, 1.0), None);
        assert_eq!(cache.lookup(3, 80, 1.5), None);
    }

    #[test]
    fn different_index_misses() {
        let mut cache = ImageCache::new();
        cache.store(3, 90, 1.0, "img".into());
        assert_eq!(cache.lookup(4, 10, 0.5), None);
    }

    #[test]
    fn store_overwrites_wholesale() {
        let mut cache = ImageCache::new();
        cache.store(3, 90, 1.0, "old".into());
        cache.store(7, 50, 0.5, "new".into());
        assert_eq!(cache.lookup(3, 10, 0.5), None);
        assert_eq!(cache.lookup(7, 50, 0.5), Some("new"));
    }

    #[test]
    fn empty_cache_misses() {
        let cache = ImageCache::new();
        assert_eq!(cache.lookup(0, 0, 0.0), None);
    }

    #[test]
    fn data_url_prefix() {
        assert_eq!(as_data_url("QUJD"), "data:image/jpeg;base64,QUJD");
    }
}

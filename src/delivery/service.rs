//! Name-addressed delivery with on-demand thumbnails.

use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use mediavault_av::Transformer;
use mediavault_common::{Error, MediaFamily, Result, TransformSpec};
use mediavault_db::models::StoredObject;
use tracing::{debug, info, warn};

use super::cache::TransformCache;
use crate::catalog::Catalog;
use crate::storage::ObjectStore;

const THUMBNAIL_MIME: &str = "image/png";

/// Largest thumbnail side served unless configured otherwise.
pub const DEFAULT_MAX_THUMBNAIL_SIZE: u32 = 4096;

/// Bytes to send back plus their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMedia {
    pub bytes: Bytes,
    pub mime: String,
}

/// Why a video thumbnail fell back to the original bytes.
#[derive(Debug, thiserror::Error)]
enum TransformDegraded {
    #[error("frame extraction is unavailable")]
    Unavailable,

    #[error("no local path for {0}")]
    NoLocalPath(String),

    #[error(transparent)]
    Failed(#[from] mediavault_av::Error),
}

/// Serves stored objects by name, rendering and caching thumbnails.
pub struct ContentDeliveryService {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ObjectStore>,
    transformer: Arc<dyn Transformer>,
    cache: Arc<TransformCache>,
    max_thumbnail_size: u32,
    video_thumbnails: OnceLock<bool>,
}

impl ContentDeliveryService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn ObjectStore>,
        transformer: Arc<dyn Transformer>,
        cache: Arc<TransformCache>,
    ) -> Self {
        Self {
            catalog,
            store,
            transformer,
            cache,
            max_thumbnail_size: DEFAULT_MAX_THUMBNAIL_SIZE,
            video_thumbnails: OnceLock::new(),
        }
    }

    /// Override the largest accepted thumbnail size. Zero is raised to one.
    pub fn with_max_thumbnail_size(mut self, size: u32) -> Self {
        self.max_thumbnail_size = size.max(1);
        self
    }

    pub fn max_thumbnail_size(&self) -> u32 {
        self.max_thumbnail_size
    }

    /// The cache this service reads and fills.
    pub fn cache(&self) -> &Arc<TransformCache> {
        &self.cache
    }

    /// Resolve `name` to bytes, optionally as a thumbnail whose larger side
    /// is `size` pixels.
    ///
    /// - Images are resized in-process; a transform error is returned.
    /// - Videos with a size get a PNG of their first frame. When frame
    ///   extraction is unavailable or fails, the original bytes are served
    ///   with the original mime and nothing is cached.
    /// - Everything else is served verbatim and never cached.
    ///
    /// A size of zero is the same as no size. Sizes above
    /// [`max_thumbnail_size`](Self::max_thumbnail_size) fail with
    /// [`Error::InvalidInput`].
    pub fn resolve_media(&self, name: &str, size: Option<u32>) -> Result<DeliveredMedia> {
        if let Some(size) = size.filter(|&s| s > self.max_thumbnail_size) {
            return Err(Error::invalid_input(format!(
                "thumbnail size {} exceeds the maximum of {}",
                size, self.max_thumbnail_size
            )));
        }
        let spec = TransformSpec::from_size(size);

        if let Some(hit) = self.cache.get(name, spec) {
            debug!("Cache hit for {} ({:?})", name, spec);
            return Ok(hit);
        }

        let object = self
            .catalog
            .find_by_name(name)?
            .ok_or_else(|| Error::not_found(format!("object '{}'", name)))?;

        match (object.family(), spec) {
            (MediaFamily::Image, spec) => self.deliver_image(&object, spec),
            (MediaFamily::Video, TransformSpec::ResizedTo(size)) => {
                self.deliver_video_thumbnail(&object, size)
            }
            _ => self.deliver_raw(&object),
        }
    }

    /// Whether video thumbnails can be rendered. Probed once per service.
    pub fn video_thumbnails_available(&self) -> bool {
        *self.video_thumbnails.get_or_init(|| {
            let available = self.transformer.probe_available();
            if available {
                info!("Video thumbnails enabled");
            } else {
                warn!("Frame extraction unavailable; videos will be served unmodified");
            }
            available
        })
    }

    fn deliver_raw(&self, object: &StoredObject) -> Result<DeliveredMedia> {
        let data = self.store.read_all(&object.path)?;
        Ok(DeliveredMedia {
            bytes: Bytes::from(data),
            mime: object.mime.clone(),
        })
    }

    fn deliver_image(&self, object: &StoredObject, spec: TransformSpec) -> Result<DeliveredMedia> {
        let data = self.store.read_all(&object.path)?;

        let bytes = match spec {
            TransformSpec::Original => data,
            TransformSpec::ResizedTo(size) => self
                .render_thumbnail(&data, size)
                .map_err(|e| Error::transform(format!("{}: {}", object.name, e)))?,
        };

        let media = DeliveredMedia {
            bytes: Bytes::from(bytes),
            mime: object.mime.clone(),
        };
        self.cache.insert(&object.name, spec, media.clone());
        Ok(media)
    }

    fn deliver_video_thumbnail(&self, object: &StoredObject, size: u32) -> Result<DeliveredMedia> {
        match self.render_video_thumbnail(object, size) {
            Ok(png) => {
                let media = DeliveredMedia {
                    bytes: Bytes::from(png),
                    mime: THUMBNAIL_MIME.to_string(),
                };
                self.cache
                    .insert(&object.name, TransformSpec::ResizedTo(size), media.clone());
                Ok(media)
            }
            Err(TransformDegraded::Unavailable) => self.deliver_raw(object),
            Err(degraded) => {
                warn!("Thumbnail for {} failed: {}", object.name, degraded);
                self.deliver_raw(object)
            }
        }
    }

    fn render_video_thumbnail(
        &self,
        object: &StoredObject,
        size: u32,
    ) -> std::result::Result<Vec<u8>, TransformDegraded> {
        if !self.video_thumbnails_available() {
            return Err(TransformDegraded::Unavailable);
        }

        let path = self
            .store
            .local_path(&object.path)
            .map_err(|_| TransformDegraded::NoLocalPath(object.path.clone()))?;
        let frame = self.transformer.extract_first_frame(&path)?;
        Ok(self.render_thumbnail(&frame, size)?)
    }

    fn render_thumbnail(&self, data: &[u8], size: u32) -> mediavault_av::Result<Vec<u8>> {
        let dims = self.transformer.decode_metadata(data)?;
        self.transformer.resize(data, dims.fit_larger_side(size))
    }
}

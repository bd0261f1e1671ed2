//! Content delivery: stored bytes or rendered thumbnails, by object name.

mod cache;
mod service;

pub use cache::{CacheKey, TransformCache, DEFAULT_CACHE_CAPACITY};
pub use service::{ContentDeliveryService, DeliveredMedia, DEFAULT_MAX_THUMBNAIL_SIZE};

//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires a full [`Vault`] over an in-memory
//! catalog, a temporary storage root and a [`FakeTransformer`] whose video
//! side is scripted per test.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use mediavault::catalog::SqliteCatalog;
use mediavault::config::Config;
use mediavault::library::Upload;
use mediavault::storage::{FsStore, ObjectStore};
use mediavault::vault::Vault;
use mediavault_av::{Dimensions, MediaTransformer, ResizeBounds, Transformer};
use mediavault_common::ObjectId;
use mediavault_db::models::StoredObject;
use mediavault_db::pool::init_memory_pool;
use tempfile::TempDir;

/// Encode a solid `width` x `height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("failed to encode png");
    out.into_inner()
}

/// Decode an image and return its size.
pub fn dimensions_of(data: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(data).expect("failed to decode image");
    (img.width(), img.height())
}

/// Transformer that resizes images for real and scripts video behavior.
pub struct FakeTransformer {
    inner: MediaTransformer,
    available: bool,
    frame: Option<Vec<u8>>,
    pub probes: AtomicUsize,
    pub extractions: AtomicUsize,
    pub resizes: AtomicUsize,
}

impl FakeTransformer {
    /// Frame extraction reported unavailable.
    pub fn without_video() -> Self {
        Self::build(false, None)
    }

    /// Frame extraction available and yielding `frame`.
    pub fn with_frame(frame: Vec<u8>) -> Self {
        Self::build(true, Some(frame))
    }

    /// Frame extraction available but always failing.
    pub fn failing_video() -> Self {
        Self::build(true, None)
    }

    fn build(available: bool, frame: Option<Vec<u8>>) -> Self {
        Self {
            inner: MediaTransformer::new(),
            available,
            frame,
            probes: AtomicUsize::new(0),
            extractions: AtomicUsize::new(0),
            resizes: AtomicUsize::new(0),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn extraction_count(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }

    pub fn resize_count(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }
}

impl Transformer for FakeTransformer {
    fn decode_metadata(&self, data: &[u8]) -> mediavault_av::Result<Dimensions> {
        self.inner.decode_metadata(data)
    }

    fn resize(&self, data: &[u8], bounds: ResizeBounds) -> mediavault_av::Result<Vec<u8>> {
        self.resizes.fetch_add(1, Ordering::SeqCst);
        self.inner.resize(data, bounds)
    }

    fn extract_first_frame(&self, path: &Path) -> mediavault_av::Result<Vec<u8>> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        match &self.frame {
            Some(frame) => Ok(frame.clone()),
            None => Err(mediavault_av::Error::tool_failed(
                "ffmpeg",
                format!("could not decode {}", path.display()),
            )),
        }
    }

    fn probe_available(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.available
    }
}

/// A vault over an in-memory catalog and a temporary storage root.
pub struct TestHarness {
    pub vault: Vault,
    pub store: Arc<FsStore>,
    pub transformer: Arc<FakeTransformer>,
    pub root: TempDir,
}

impl TestHarness {
    /// Default configuration, no video support.
    pub fn new() -> Self {
        Self::with_parts(Config::default(), FakeTransformer::without_video())
    }

    /// Default configuration with a custom transformer.
    pub fn with_transformer(transformer: FakeTransformer) -> Self {
        Self::with_parts(Config::default(), transformer)
    }

    /// Custom configuration, no video support.
    pub fn with_config(config: Config) -> Self {
        Self::with_parts(config, FakeTransformer::without_video())
    }

    pub fn with_parts(config: Config, transformer: FakeTransformer) -> Self {
        let root = tempfile::tempdir().expect("failed to create storage root");
        let pool = init_memory_pool().expect("failed to create in-memory pool");
        let store = Arc::new(FsStore::new(root.path()));
        let transformer = Arc::new(transformer);

        let vault = Vault::assemble(
            SqliteCatalog::new(pool),
            store.clone() as Arc<dyn ObjectStore>,
            transformer.clone() as Arc<dyn Transformer>,
            &config,
        );

        Self {
            vault,
            store,
            transformer,
            root,
        }
    }

    /// Ingest `data` under an explicit name; the mime follows the name's
    /// extension.
    pub fn put(&self, name: &str, data: &[u8]) -> StoredObject {
        let ingested = self
            .vault
            .library
            .ingest(Upload {
                file_name: name.to_string(),
                data: data.to_vec(),
                name: Some(name.to_string()),
                ..Default::default()
            })
            .expect("failed to ingest");
        self.get(ingested.id)
    }

    /// Look up an object that must exist.
    pub fn get(&self, id: ObjectId) -> StoredObject {
        self.vault
            .library
            .detail(id)
            .expect("failed to load object")
            .expect("object should exist")
    }

    /// Absolute path of an object's stored file.
    pub fn file_path(&self, object: &StoredObject) -> std::path::PathBuf {
        self.root.path().join(&object.path)
    }
}

//! Wiring of the vault's components from configuration.

use std::sync::Arc;

use mediavault_av::{MediaTransformer, Transformer};
use mediavault_common::Result;
use mediavault_db::pool::init_pool;
use tracing::info;

use crate::catalog::{Catalog, SqliteCatalog};
use crate::config::Config;
use crate::delivery::{ContentDeliveryService, TransformCache};
use crate::library::MediaLibrary;
use crate::listing::PaginationEngine;
use crate::naming::NameGenerator;
use crate::storage::{FsStore, ObjectStore};

/// Every service of one vault, sharing a catalog, store and cache.
#[derive(Clone)]
pub struct Vault {
    pub catalog: Arc<SqliteCatalog>,
    pub names: Arc<NameGenerator>,
    pub delivery: Arc<ContentDeliveryService>,
    pub listing: Arc<PaginationEngine>,
    pub library: Arc<MediaLibrary>,
}

impl Vault {
    /// Open the catalog, create the storage root and build the services.
    pub fn open(config: &Config) -> Result<Self> {
        let db_path = config.storage.database.to_string_lossy();
        info!("Opening catalog at {}", db_path);
        let pool = init_pool(&db_path)?;

        std::fs::create_dir_all(&config.storage.root_dir)?;
        let store: Arc<dyn ObjectStore> = Arc::new(FsStore::new(&config.storage.root_dir));

        let transformer: Arc<dyn Transformer> = match &config.delivery.ffmpeg_path {
            Some(path) => Arc::new(MediaTransformer::with_ffmpeg(path)),
            None => Arc::new(MediaTransformer::new()),
        };

        Ok(Self::assemble(
            SqliteCatalog::new(pool),
            store,
            transformer,
            config,
        ))
    }

    /// Build the services over already constructed backends.
    pub fn assemble(
        catalog: SqliteCatalog,
        store: Arc<dyn ObjectStore>,
        transformer: Arc<dyn Transformer>,
        config: &Config,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let read_side: Arc<dyn Catalog> = catalog.clone();
        let cache = Arc::new(TransformCache::new(config.delivery.cache_capacity));

        let names = Arc::new(
            NameGenerator::new(read_side.clone())
                .with_word_list_dir(config.naming.word_list_dir.clone())
                .with_max_attempts(config.naming.max_attempts),
        );

        let delivery = Arc::new(
            ContentDeliveryService::new(read_side.clone(), store.clone(), transformer, cache.clone())
                .with_max_thumbnail_size(config.delivery.max_thumbnail_size),
        );

        let listing = Arc::new(
            PaginationEngine::new(read_side)
                .with_limits(config.listing.default_limit, config.listing.max_limit),
        );

        let library = Arc::new(MediaLibrary::new(
            catalog.clone(),
            store,
            names.clone(),
            cache,
            config.naming.template.clone(),
        ));

        Self {
            catalog,
            names,
            delivery,
            listing,
            library,
        }
    }
}

//! Ingestion and editing of cataloged objects.
//!
//! Writes go through [`MediaLibrary`] so the transform cache is purged for
//! every name that is renamed, edited or deleted.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mediavault_common::paths::{dotted_extension, mime_for_path};
use mediavault_common::{Error, ObjectId, Result};
use mediavault_db::models::{NewObject, StoredObject};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::SqliteCatalog;
use crate::delivery::TransformCache;
use crate::naming::{random_base36, NameGenerator};
use crate::storage::ObjectStore;

/// Insert attempts for a generated name before giving up.
const INSERT_ATTEMPTS: u32 = 3;

/// Longest accepted object name, matching the catalog constraint.
const MAX_NAME_LEN: usize = 127;

/// Random characters prefixed to each stored file name.
const LOCATOR_TOKEN_LEN: usize = 10;

/// An incoming file.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Original file name; only its extension is kept.
    pub file_name: String,
    /// Content type; derived from the extension when unset.
    pub mime: Option<String>,
    pub data: Vec<u8>,
    /// Explicit name; a generated one is used when unset.
    pub name: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestedObject {
    pub id: ObjectId,
    pub name: String,
    pub url: String,
}

/// Public URL an object is delivered under.
pub fn object_url(name: &str) -> String {
    format!("/api/files/{}", name)
}

/// Reject names that cannot double as a file name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_input("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::invalid_input(format!(
            "name is longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::invalid_input(format!("invalid name '{}'", name)));
    }
    Ok(())
}

/// Storage locator for a new object: `<YYYY-MM>/<token>-<name>`.
///
/// Locators outlive renames, so a name freed by a rename may come back with
/// a later upload; the token keeps the two files apart.
fn locator_for(name: &str, token: &str, now: DateTime<Utc>) -> String {
    format!("{}/{}-{}", now.format("%Y-%m"), token, name)
}

pub struct MediaLibrary {
    catalog: Arc<SqliteCatalog>,
    store: Arc<dyn ObjectStore>,
    names: Arc<NameGenerator>,
    cache: Arc<TransformCache>,
    template: String,
}

impl MediaLibrary {
    pub fn new(
        catalog: Arc<SqliteCatalog>,
        store: Arc<dyn ObjectStore>,
        names: Arc<NameGenerator>,
        cache: Arc<TransformCache>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            names,
            cache,
            template: template.into(),
        }
    }

    /// The naming template used for uploads without an explicit name.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Catalog and store an upload.
    ///
    /// The row is inserted first so the unique name constraint is settled
    /// before any bytes land on disk. A generated name that loses an
    /// insert race is regenerated; an explicit name that is taken fails
    /// with [`Error::AlreadyExists`].
    pub fn ingest(&self, upload: Upload) -> Result<IngestedObject> {
        let extension = dotted_extension(&upload.file_name);
        let mime = upload
            .mime
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| mime_for_path(Path::new(&upload.file_name)).to_string());

        if let Some(name) = &upload.name {
            validate_name(name)?;
        }

        let mut attempt = 0;
        let object = loop {
            attempt += 1;
            let (name, generated) = match &upload.name {
                Some(name) => (name.clone(), false),
                None => (
                    self.names.generate_unique_name(&self.template, &extension)?,
                    true,
                ),
            };
            validate_name(&name)?;

            let new_object = NewObject {
                name: name.clone(),
                path: locator_for(&name, &random_base36(LOCATOR_TOKEN_LEN), Utc::now()),
                mime: mime.clone(),
                description: upload.description.clone(),
                tags: upload.tags.clone(),
            };

            match self.catalog.insert(&new_object) {
                Ok(object) => break object,
                Err(Error::AlreadyExists(_)) if generated && attempt < INSERT_ATTEMPTS => {
                    debug!("Lost insert race for {}, regenerating", name);
                }
                Err(e) => return Err(e),
            }
        };

        if let Err(e) = self.store.write(&object.path, &upload.data) {
            warn!("Failed to store {}: {}", object.name, e);
            if let Err(rollback) = self.catalog.delete(object.id) {
                warn!("Failed to roll back catalog row {}: {}", object.id, rollback);
            }
            return Err(e);
        }

        // A previous object with this name may still have renderings cached.
        self.cache.purge_object(&object.name);

        info!(
            "Ingested {} ({}, {} bytes) as {}",
            object.name,
            object.mime,
            upload.data.len(),
            object.id
        );

        Ok(IngestedObject {
            id: object.id,
            url: object_url(&object.name),
            name: object.name,
        })
    }

    /// Look up an object with its tags.
    pub fn detail(&self, id: ObjectId) -> Result<Option<StoredObject>> {
        self.catalog.get(id)
    }

    /// Rename an object. The stored file keeps its locator.
    pub fn rename(&self, id: ObjectId, new_name: &str) -> Result<StoredObject> {
        validate_name(new_name)?;
        let current = self.require(id)?;

        let renamed = self.catalog.rename(id, new_name)?;
        self.cache.purge_object(&current.name);
        self.cache.purge_object(&renamed.name);

        info!("Renamed {} to {}", current.name, renamed.name);
        Ok(renamed)
    }

    /// Replace name, description and tags in one step.
    pub fn update_details(
        &self,
        id: ObjectId,
        name: &str,
        description: &str,
        tags: &[String],
    ) -> Result<StoredObject> {
        validate_name(name)?;
        let current = self.require(id)?;

        let updated = self.catalog.update_details(id, name, description, tags)?;
        self.cache.purge_object(&current.name);
        self.cache.purge_object(&updated.name);

        debug!("Updated details of {}", updated.name);
        Ok(updated)
    }

    /// Delete an object, its tags and its stored file.
    ///
    /// A file that cannot be removed is logged and otherwise ignored.
    pub fn delete(&self, id: ObjectId) -> Result<StoredObject> {
        let object = self.require(id)?;

        if let Err(e) = self.store.remove(&object.path) {
            warn!("Failed to remove stored file for {}: {}", object.name, e);
        }

        let deleted = self
            .catalog
            .delete(id)?
            .ok_or_else(|| Error::not_found(format!("object {}", id)))?;
        self.cache.purge_object(&deleted.name);

        info!("Deleted {}", deleted.name);
        Ok(deleted)
    }

    /// Drop every cached rendering.
    pub fn purge_cache(&self) {
        self.cache.clear();
    }

    fn require(&self, id: ObjectId) -> Result<StoredObject> {
        self.catalog
            .get(id)?
            .ok_or_else(|| Error::not_found(format!("object {}", id)))
    }
}

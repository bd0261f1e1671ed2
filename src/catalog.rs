//! The catalog interface consumed by naming, delivery and listing.
//!
//! [`Catalog`] is the narrow read-side seam; [`SqliteCatalog`] implements it
//! over the r2d2 pool and also carries the write operations used at
//! ingestion.

use mediavault_common::{ObjectId, Result};
use mediavault_db::models::{NewObject, ObjectFilter, StoredObject};
use mediavault_db::pool::{get_conn, DbPool};
use mediavault_db::queries::{listing, objects};

/// Read access to cataloged objects.
pub trait Catalog: Send + Sync {
    /// Look up an object (with tags) by its unique name.
    fn find_by_name(&self, name: &str) -> Result<Option<StoredObject>>;

    /// Whether any object has this name.
    fn exists_by_name(&self, name: &str) -> Result<bool>;

    /// Up to `limit` matching objects with id at or below `upper_bound`,
    /// newest first, tags attached.
    fn query_page(
        &self,
        filter: &ObjectFilter,
        upper_bound: Option<ObjectId>,
        limit: u32,
    ) -> Result<Vec<StoredObject>>;

    /// Number of matching objects with id at or below `upper_bound`.
    fn count_where(&self, filter: &ObjectFilter, upper_bound: Option<ObjectId>) -> Result<u64>;

    /// The matching object with the highest id.
    fn max_id_where(&self, filter: &ObjectFilter) -> Result<Option<StoredObject>>;
}

/// SQLite-backed catalog.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: DbPool,
}

impl SqliteCatalog {
    /// Wrap an initialized (migrated) pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert a new object with its tags.
    pub fn insert(&self, object: &NewObject) -> Result<StoredObject> {
        let conn = get_conn(&self.pool)?;
        objects::insert_object(&conn, object)
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Result<Option<StoredObject>> {
        let conn = get_conn(&self.pool)?;
        objects::get_object(&conn, id)
    }

    /// Rename an object.
    pub fn rename(&self, id: ObjectId, new_name: &str) -> Result<StoredObject> {
        let conn = get_conn(&self.pool)?;
        objects::rename_object(&conn, id, new_name)
    }

    /// Replace name, description and tags.
    pub fn update_details(
        &self,
        id: ObjectId,
        name: &str,
        description: &str,
        tags: &[String],
    ) -> Result<StoredObject> {
        let conn = get_conn(&self.pool)?;
        objects::update_object_details(&conn, id, name, description, tags)
    }

    /// Delete an object, returning the removed row.
    pub fn delete(&self, id: ObjectId) -> Result<Option<StoredObject>> {
        let conn = get_conn(&self.pool)?;
        objects::delete_object(&conn, id)
    }
}

impl Catalog for SqliteCatalog {
    fn find_by_name(&self, name: &str) -> Result<Option<StoredObject>> {
        let conn = get_conn(&self.pool)?;
        objects::get_object_by_name(&conn, name)
    }

    fn exists_by_name(&self, name: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        objects::object_exists(&conn, name)
    }

    fn query_page(
        &self,
        filter: &ObjectFilter,
        upper_bound: Option<ObjectId>,
        limit: u32,
    ) -> Result<Vec<StoredObject>> {
        let conn = get_conn(&self.pool)?;
        listing::query_page(&conn, filter, upper_bound, limit)
    }

    fn count_where(&self, filter: &ObjectFilter, upper_bound: Option<ObjectId>) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        listing::count_where(&conn, filter, upper_bound)
    }

    fn max_id_where(&self, filter: &ObjectFilter) -> Result<Option<StoredObject>> {
        let conn = get_conn(&self.pool)?;
        listing::max_id_where(&conn, filter)
    }
}

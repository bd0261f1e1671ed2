//! Cursor-based listing over the catalog.
//!
//! A listing starts with [`PaginationEngine::init_page`], which pins the
//! newest matching id as the initial cursor and counts everything at or
//! below it. Pages are then fetched with [`PaginationEngine::get_page`];
//! the cursor is inclusive, and `next_cursor` is the id of the first row
//! not returned. Objects ingested after the listing started have larger
//! ids and never show up in it.

use std::sync::Arc;

use mediavault_common::{Error, ObjectId, Result};
use mediavault_db::models::{ObjectFilter, StoredObject};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// Largest page a caller may request; larger requests are clamped.
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Start of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInit {
    pub item_count: u64,
    pub initial_cursor: Option<ObjectId>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<StoredObject>,
    pub next_cursor: Option<ObjectId>,
}

pub struct PaginationEngine {
    catalog: Arc<dyn Catalog>,
    default_limit: u32,
    max_limit: u32,
}

impl PaginationEngine {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }

    /// Override the page size limits. `max_limit` is raised to at least
    /// `default_limit`.
    pub fn with_limits(mut self, default_limit: u32, max_limit: u32) -> Self {
        self.default_limit = default_limit.max(1);
        self.max_limit = max_limit.max(self.default_limit);
        self
    }

    /// Count matching objects and pick the starting cursor.
    ///
    /// An empty result is `{ item_count: 0, initial_cursor: None }`.
    pub fn init_page(&self, filter: &ObjectFilter) -> Result<PageInit> {
        let Some(newest) = self.catalog.max_id_where(filter)? else {
            return Ok(PageInit {
                item_count: 0,
                initial_cursor: None,
            });
        };

        let item_count = self.catalog.count_where(filter, Some(newest.id))?;
        debug!("Listing starts at {} with {} item(s)", newest.id, item_count);

        Ok(PageInit {
            item_count,
            initial_cursor: Some(newest.id),
        })
    }

    /// Fetch up to `limit` matching objects with id at or below `cursor`,
    /// newest first.
    ///
    /// No cursor starts at the newest match. `None` limit means the default;
    /// zero is rejected and anything above the maximum is clamped.
    pub fn get_page(
        &self,
        filter: &ObjectFilter,
        cursor: Option<ObjectId>,
        limit: Option<u32>,
    ) -> Result<Page> {
        let limit = self.effective_limit(limit)?;

        let mut items = self
            .catalog
            .query_page(filter, cursor, limit.saturating_add(1))?;

        let next_cursor = if items.len() > limit as usize {
            items.truncate(limit as usize + 1);
            items.pop().map(|extra| extra.id)
        } else {
            None
        };

        Ok(Page { items, next_cursor })
    }

    fn effective_limit(&self, requested: Option<u32>) -> Result<u32> {
        match requested {
            None => Ok(self.default_limit),
            Some(0) => Err(Error::invalid_input("page limit must be at least 1")),
            Some(limit) => Ok(limit.min(self.max_limit)),
        }
    }
}

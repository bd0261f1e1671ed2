//! Rust models matching the catalog schema.
//!
//! This module provides strongly-typed structures that map to the `objects`
//! and `tags` tables, plus the filter used by listing queries.

use chrono::{DateTime, Utc};
use mediavault_common::{MediaFamily, ObjectId};
use serde::{Deserialize, Serialize};

/// A cataloged upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredObject {
    pub id: ObjectId,
    /// Globally unique, user-facing name (also the delivery key).
    pub name: String,
    /// Storage locator, relative to the object store root.
    pub path: String,
    pub mime: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Tags in insertion order, without duplicates.
    pub tags: Vec<String>,
}

impl StoredObject {
    /// Mime family of this object.
    pub fn family(&self) -> MediaFamily {
        MediaFamily::from_mime(&self.mime)
    }
}

/// Values for a new catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewObject {
    pub name: String,
    pub path: String,
    pub mime: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Mime-based narrowing for listings.
///
/// The gallery flag and a raw mime substring are alternatives; a listing
/// can use one or the other, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindFilter {
    /// Only `image/*` and `video/*` objects.
    Gallery,
    /// Objects whose mime contains the given substring.
    MimeContains(String),
}

/// Listing filter: a conjunction of an optional name substring and an
/// optional kind filter. The default filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectFilter {
    pub name_contains: Option<String>,
    pub kind: Option<KindFilter>,
}

impl ObjectFilter {
    /// A filter matching every object.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to names containing `needle`.
    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Restrict to images and videos.
    pub fn gallery(mut self) -> Self {
        self.kind = Some(KindFilter::Gallery);
        self
    }

    /// Restrict to mime types containing `needle`.
    pub fn with_mime(mut self, needle: impl Into<String>) -> Self {
        self.kind = Some(KindFilter::MimeContains(needle.into()));
        self
    }

    /// The name needle, ignoring empty strings.
    pub fn name_needle(&self) -> Option<&str> {
        self.name_contains.as_deref().filter(|s| !s.is_empty())
    }

    /// The kind restriction, ignoring an empty mime needle.
    pub fn effective_kind(&self) -> Option<&KindFilter> {
        match &self.kind {
            Some(KindFilter::MimeContains(needle)) if needle.is_empty() => None,
            other => other.as_ref(),
        }
    }

    /// Whether an object satisfies this filter.
    ///
    /// The in-memory reference for the SQL the listing queries build; the
    /// listing query tests check both agree.
    pub fn matches(&self, object: &StoredObject) -> bool {
        if let Some(needle) = self.name_needle() {
            if !contains_ignore_ascii_case(&object.name, needle) {
                return false;
            }
        }
        match self.effective_kind() {
            Some(KindFilter::Gallery) => object.family().is_gallery(),
            Some(KindFilter::MimeContains(needle)) => {
                contains_ignore_ascii_case(&object.mime, needle)
            }
            None => true,
        }
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

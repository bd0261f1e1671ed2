//! Unique name generation against the catalog.

use std::path::PathBuf;
use std::sync::Arc;

use mediavault_common::{Error, Result};
use rand::rngs::OsRng;
use rand::Rng;
use tracing::{debug, warn};

use super::template::{NameTemplate, Placeholder, Segment};
use super::wordlist::WordListCache;
use crate::catalog::Catalog;

/// Attempts before giving up on finding a free name.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Resolves naming templates into names not yet present in the catalog.
pub struct NameGenerator {
    catalog: Arc<dyn Catalog>,
    word_lists: WordListCache,
    max_attempts: u32,
}

impl NameGenerator {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            word_lists: WordListCache::new(None),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Resolve relative `{pick FILE}` paths against `dir`.
    pub fn with_word_list_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.word_lists = WordListCache::new(dir);
        self
    }

    /// Override the retry budget. Zero is raised to one.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Produce one candidate by substituting every placeholder.
    pub fn resolve(&self, template: &NameTemplate) -> Result<String> {
        let mut name = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => name.push_str(text),
                Segment::Placeholder(Placeholder::Chars(count)) => {
                    name.push_str(&random_base36(*count));
                }
                Segment::Placeholder(Placeholder::Pick(file)) => {
                    name.push_str(&self.word_lists.pick(file)?);
                }
            }
        }
        Ok(name)
    }

    /// Generate `resolve(template) + extension` until the catalog has no
    /// object by that name.
    ///
    /// `extension` is appended verbatim and should include its leading dot
    /// (or be empty). Template errors surface on the first attempt;
    /// exhausting the budget returns [`Error::RetryExhausted`].
    pub fn generate_unique_name(&self, template: &str, extension: &str) -> Result<String> {
        let template = NameTemplate::parse(template)?;

        for attempt in 1..=self.max_attempts {
            let name = format!("{}{}", self.resolve(&template)?, extension);
            if name.is_empty() {
                return Err(Error::template("template produced an empty name"));
            }

            if !self.catalog.exists_by_name(&name)? {
                debug!("Generated name {} after {} attempt(s)", name, attempt);
                return Ok(name);
            }
            debug!("Name {} already taken (attempt {})", name, attempt);
        }

        warn!(
            "Couldn't find a free name after {} attempts",
            self.max_attempts
        );
        Err(Error::RetryExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// `count` random characters from `[0-9a-z]`.
pub(crate) fn random_base36(count: usize) -> String {
    let mut rng = OsRng;
    (0..count)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

//! Cached word lists for `{pick FILE}` placeholders.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mediavault_common::{Error, Result};
use parking_lot::RwLock;
use rand::seq::SliceRandom;

/// Word lists loaded on first use and kept for the life of the process.
#[derive(Debug, Default)]
pub struct WordListCache {
    base_dir: Option<PathBuf>,
    lists: RwLock<HashMap<String, Arc<Vec<String>>>>,
}

impl WordListCache {
    /// Resolve relative list names against `base_dir` when given.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            base_dir,
            lists: RwLock::new(HashMap::new()),
        }
    }

    fn path_for(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Load (or reuse) the list stored in `file`.
    ///
    /// Lines are trimmed and blank lines dropped.
    pub fn get(&self, file: &str) -> Result<Arc<Vec<String>>> {
        if let Some(list) = self.lists.read().get(file) {
            return Ok(Arc::clone(list));
        }

        let contents = std::fs::read_to_string(self.path_for(file))?;
        let words: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if words.is_empty() {
            return Err(Error::template(format!("word list '{}' is empty", file)));
        }

        let mut lists = self.lists.write();
        let list = lists
            .entry(file.to_string())
            .or_insert_with(|| Arc::new(words));
        Ok(Arc::clone(list))
    }

    /// A uniformly random word from `file`.
    pub fn pick(&self, file: &str) -> Result<String> {
        let list = self.get(file)?;
        list.choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| Error::template(format!("word list '{}' is empty", file)))
    }

    /// Number of lists currently cached.
    pub fn len(&self) -> usize {
        self.lists.read().len()
    }

    /// Whether no list has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.lists.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("words.txt"), "  alpha  \n\n\tbeta\r\n").unwrap();

        let cache = WordListCache::new(Some(dir.path().to_path_buf()));
        let list = cache.get("words.txt").unwrap();
        assert_eq!(list.as_slice(), &["alpha".to_string(), "beta".to_string()]);

        for _ in 0..20 {
            let word = cache.pick("words.txt").unwrap();
            assert!(word == "alpha" || word == "beta");
        }
    }

    #[test]
    fn test_list_is_cached_after_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.txt");
        std::fs::write(&path, "only\n").unwrap();

        let cache = WordListCache::new(None);
        let file = path.to_string_lossy().into_owned();
        assert_eq!(cache.pick(&file).unwrap(), "only");

        std::fs::remove_file(&path).unwrap();
        assert_eq!(cache.pick(&file).unwrap(), "only");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cache = WordListCache::new(None);
        assert!(matches!(cache.get("/nonexistent/words.txt"), Err(Error::Io(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_blank_file_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blank.txt"), "\n  \n").unwrap();

        let cache = WordListCache::new(Some(dir.path().to_path_buf()));
        assert!(matches!(cache.get("blank.txt"), Err(Error::Template(_))));
    }
}

//! Shuffle pool

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One playable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPoolEntry {
    pub id: String,
    pub title: String,
}

impl VideoPoolEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Items deduplicated by id, in first-seen order
///
/// When an id shows up again its title is ignored; the first title wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoPool {
    entries: Vec<VideoPoolEntry>,
    #[serde(skip)]
    ids: HashSet<String>,
}

impl VideoPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; returns false if its id was already present
    pub fn insert(&mut self, entry: VideoPoolEntry) -> bool {
        if entry.id.is_empty() || !self.ids.insert(entry.id.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[VideoPoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

impl FromIterator<VideoPoolEntry> for VideoPool {
    fn from_iter<I: IntoIterator<Item = VideoPoolEntry>>(iter: I) -> Self {
        let mut pool = VideoPool::new();
        pool.extend(iter);
        pool
    }
}

impl Extend<VideoPoolEntry> for VideoPool {
    fn extend<I: IntoIterator<Item = VideoPoolEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_first_title_wins() {
        let pool: VideoPool = vec![
            VideoPoolEntry::new("a", "first"),
            VideoPoolEntry::new("b", "bee"),
            VideoPoolEntry::new("a", "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entries()[0], VideoPoolEntry::new("a", "first"));
        assert_eq!(pool.entries()[1].id, "b");
    }

    #[test]
    fn test_empty_ids_dropped() {
        let mut pool = VideoPool::new();
        assert!(!pool.insert(VideoPoolEntry::new("", "nothing")));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            VideoPoolEntry::new("abc123", "t").watch_url(),
            "https://www.youtube.com/watch?v=abc123"
        );
    }
}

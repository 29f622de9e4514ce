//! In-memory editing model for the admin form
//!
//! The editor owns one full copy of the document. Every edit swaps out one
//! section (or one link) for a new value and marks the copy dirty. The only
//! way out is [`ConfigEditor::snapshot`], which serializes the whole document
//! for download; nothing is written back to disk.

use super::features::FeatureToggle;
use super::loader::to_pretty_json;
use super::schema::{
    Features, LinkEntry, SiteConfiguration, SiteText, Theme, Wallpapers, YouTubeSettings,
};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ConfigEditor {
    config: SiteConfiguration,
    dirty: bool,
}

impl ConfigEditor {
    pub fn new(config: SiteConfiguration) -> Self {
        Self {
            config,
            dirty: false,
        }
    }

    pub fn config(&self) -> &SiteConfiguration {
        &self.config
    }

    /// True once any edit has been applied since loading
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn update_site(&mut self, f: impl FnOnce(SiteText) -> SiteText) {
        self.config.site = f(std::mem::take(&mut self.config.site));
        self.dirty = true;
    }

    pub fn update_theme(&mut self, f: impl FnOnce(Theme) -> Theme) {
        self.config.theme = f(std::mem::take(&mut self.config.theme));
        self.dirty = true;
    }

    pub fn update_features(&mut self, f: impl FnOnce(Features) -> Features) {
        self.config.features = f(std::mem::take(&mut self.config.features));
        self.dirty = true;
    }

    pub fn update_youtube(&mut self, f: impl FnOnce(YouTubeSettings) -> YouTubeSettings) {
        self.config.youtube = f(std::mem::take(&mut self.config.youtube));
        self.dirty = true;
    }

    pub fn update_wallpapers(&mut self, f: impl FnOnce(Wallpapers) -> Wallpapers) {
        self.config.wallpapers = f(std::mem::take(&mut self.config.wallpapers));
        self.dirty = true;
    }

    pub fn set_feature(&mut self, toggle: FeatureToggle, enabled: bool) {
        self.update_features(|mut features| {
            features.set(toggle, enabled);
            features
        });
    }

    /// Replace the link at `index`
    pub fn update_link(
        &mut self,
        index: usize,
        f: impl FnOnce(LinkEntry) -> LinkEntry,
    ) -> Result<()> {
        let slot = self
            .config
            .links
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("link index {}", index)))?;
        *slot = f(std::mem::take(slot));
        self.dirty = true;
        Ok(())
    }

    /// Swap the link at `index` with its predecessor
    ///
    /// Returns false (and leaves the document untouched) at index 0 or when
    /// the index is out of range.
    pub fn move_link_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.config.links.len() {
            return false;
        }
        self.config.links.swap(index - 1, index);
        self.dirty = true;
        true
    }

    /// Swap the link at `index` with its successor
    ///
    /// Returns false at the last index or when the index is out of range.
    pub fn move_link_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.config.links.len() {
            return false;
        }
        self.config.links.swap(index, index + 1);
        self.dirty = true;
        true
    }

    /// Downloadable JSON of the whole document
    pub fn snapshot(&self) -> Result<String> {
        to_pretty_json(&self.config)
    }
}

/// Split a textarea value into trimmed, non-empty lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty input means "no badge"
pub fn optional_text(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

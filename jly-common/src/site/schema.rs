//! Site configuration schema
//!
//! One JSON document describes everything an operator can edit: page text,
//! theme images, feature toggles, the link list and the wallpaper gallery.
//! Field names on the wire are camelCase and every field is optional on
//! input, so a hand-authored document may omit anything it does not use.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Highest document version this build understands.
///
/// Newer documents are still loaded; nothing migrates between versions.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Usage note shown on the gallery when the document has no `note` key
pub const DEFAULT_WALLPAPER_NOTE: &str = "使用提醒：僅供個人欣賞與分享，請勿商用。";

/// The whole site configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfiguration {
    pub version: u32,
    pub site: SiteText,
    pub theme: Theme,
    pub features: Features,
    pub youtube: YouTubeSettings,
    pub links: Vec<LinkEntry>,
    pub wallpapers: Wallpapers,
}

/// Display title, SEO description and biography lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteText {
    pub title: String,
    pub description: String,
    pub bio_lines: Vec<String>,
}

/// Image paths relative to the static asset root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub background_image: String,
    pub logo_title_image: String,
    pub footer_logo_image: String,
}

/// Feature toggles and the text they carry
///
/// The three video toggles keep the document's `YouTube` capitalization,
/// which camelCase renaming would not produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    pub enable_whispers: bool,
    pub whispers: Vec<String>,
    pub enable_cheer_button: bool,
    pub cheer_label: String,
    #[serde(rename = "enableYouTubeLatest")]
    pub enable_youtube_latest: bool,
    #[serde(rename = "enableYouTubePlayer")]
    pub enable_youtube_player: bool,
    #[serde(rename = "enableYouTubeShuffle")]
    pub enable_youtube_shuffle: bool,
}

/// Video channel settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YouTubeSettings {
    pub channel_id: String,
    pub latest_button_label: String,
}

impl YouTubeSettings {
    /// Channel root URL, the fallback target whenever no item is known
    pub fn channel_url(&self) -> String {
        let id = self.channel_id.trim();
        if id.is_empty() {
            "https://www.youtube.com/".to_string()
        } else {
            format!("https://www.youtube.com/channel/{}", id)
        }
    }
}

/// Glyph shown next to a link label
///
/// Closed set. A document naming any other icon fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Youtube,
    Crown,
    Headphones,
    #[default]
    Music,
    AtSign,
    Image,
}

impl Icon {
    /// Every icon, in selector order
    pub const ALL: [Icon; 6] = [
        Icon::Youtube,
        Icon::Crown,
        Icon::Headphones,
        Icon::Music,
        Icon::AtSign,
        Icon::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Youtube => "Youtube",
            Icon::Crown => "Crown",
            Icon::Headphones => "Headphones",
            Icon::Music => "Music",
            Icon::AtSign => "AtSign",
            Icon::Image => "Image",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Icon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown icon: {}", s)))
    }
}

/// One outbound link button
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkEntry {
    /// Render key, unique within the list
    pub id: String,
    pub enabled: bool,
    pub label: String,
    pub url: String,
    pub icon: Icon,
    /// Style token for the hover gradient
    pub gradient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_left: Option<String>,
}

/// Wallpaper gallery settings
///
/// Missing keys take the values from [`Wallpapers::default`]: the gallery is
/// enabled unless the document turns it off explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Wallpapers {
    pub enabled: bool,
    pub title: String,
    pub note: String,
    pub local_base: String,
    /// Takes precedence over `local_base` when set and non-blank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_base_url: Option<String>,
    pub files: Vec<String>,
}

impl Default for Wallpapers {
    fn default() -> Self {
        Self {
            enabled: true,
            title: String::new(),
            note: DEFAULT_WALLPAPER_NOTE.to_string(),
            local_base: String::new(),
            remote_base_url: None,
            files: Vec::new(),
        }
    }
}

impl SiteConfiguration {
    /// Enabled links in document order
    pub fn visible_links(&self) -> impl Iterator<Item = &LinkEntry> {
        self.links.iter().filter(|link| link.enabled)
    }

    /// Link ids that appear more than once, each reported once
    pub fn duplicate_link_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for link in &self.links {
            if !seen.insert(link.id.as_str()) && reported.insert(link.id.as_str()) {
                duplicates.push(link.id.as_str());
            }
        }
        duplicates
    }

    /// True when the document claims a schema newer than this build knows
    pub fn is_newer_than_supported(&self) -> bool {
        self.version > CURRENT_SCHEMA_VERSION
    }
}

//! Feature toggle table
//!
//! Each toggle is a named field on [`Features`]. Anything that needs to walk
//! all toggles (the admin form, form parsing) goes through [`FEATURE_TOGGLES`]
//! instead of looking fields up by string.

use super::schema::Features;

/// One boolean switch in the `features` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureToggle {
    Whispers,
    CheerButton,
    YouTubeLatest,
    YouTubePlayer,
    YouTubeShuffle,
}

/// Every toggle with its admin form label, in display order
pub const FEATURE_TOGGLES: [(FeatureToggle, &str); 5] = [
    (FeatureToggle::Whispers, "碎碎念（whispers）"),
    (FeatureToggle::CheerButton, "加油按鈕（點亮星火）"),
    (FeatureToggle::YouTubeLatest, "顯示「最新作品」按鈕"),
    (FeatureToggle::YouTubePlayer, "顯示底部播放器"),
    (FeatureToggle::YouTubeShuffle, "顯示 Shuffle 按鈕"),
];

impl FeatureToggle {
    /// JSON key of the toggle inside the `features` object
    pub fn key(&self) -> &'static str {
        match self {
            FeatureToggle::Whispers => "enableWhispers",
            FeatureToggle::CheerButton => "enableCheerButton",
            FeatureToggle::YouTubeLatest => "enableYouTubeLatest",
            FeatureToggle::YouTubePlayer => "enableYouTubePlayer",
            FeatureToggle::YouTubeShuffle => "enableYouTubeShuffle",
        }
    }
}

impl Features {
    pub fn is_enabled(&self, toggle: FeatureToggle) -> bool {
        match toggle {
            FeatureToggle::Whispers => self.enable_whispers,
            FeatureToggle::CheerButton => self.enable_cheer_button,
            FeatureToggle::YouTubeLatest => self.enable_youtube_latest,
            FeatureToggle::YouTubePlayer => self.enable_youtube_player,
            FeatureToggle::YouTubeShuffle => self.enable_youtube_shuffle,
        }
    }

    pub fn set(&mut self, toggle: FeatureToggle, enabled: bool) {
        let field = match toggle {
            FeatureToggle::Whispers => &mut self.enable_whispers,
            FeatureToggle::CheerButton => &mut self.enable_cheer_button,
            FeatureToggle::YouTubeLatest => &mut self.enable_youtube_latest,
            FeatureToggle::YouTubePlayer => &mut self.enable_youtube_player,
            FeatureToggle::YouTubeShuffle => &mut self.enable_youtube_shuffle,
        };
        *field = enabled;
    }
}

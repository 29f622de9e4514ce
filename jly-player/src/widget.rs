//! Embedded widget capability
//!
//! Mirrors the command surface of the platform's iframe player: construct
//! once against a mount point, then cue / load-and-play / play / pause, read
//! time, duration and state, destroy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlayerError;

/// DOM element id the widget is constructed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPoint(pub String);

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Widget playback state, using the platform's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl WidgetState {
    /// Map a platform state code; unknown codes yield `None`
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(WidgetState::Unstarted),
            0 => Some(WidgetState::Ended),
            1 => Some(WidgetState::Playing),
            2 => Some(WidgetState::Paused),
            3 => Some(WidgetState::Buffering),
            5 => Some(WidgetState::Cued),
            _ => None,
        }
    }
}

/// Short user-facing message for a widget error code
pub fn error_message(code: i32) -> &'static str {
    match code {
        2 => "影片參數錯誤，無法播放。",
        5 => "播放器發生錯誤，請稍後再試。",
        100 => "找不到這部影片，可能已被移除或設為私人。",
        101 | 150 => "這部影片不允許嵌入播放，請改到 YouTube 觀看。",
        _ => "播放器發生未知錯誤。",
    }
}

/// One constructed widget instance
pub trait EmbedWidget: Send {
    /// Load an item without starting playback
    fn cue(&mut self, item_id: &str) -> Result<(), PlayerError>;

    /// Load an item and start playback; only valid inside a user gesture
    fn load_and_play(&mut self, item_id: &str) -> Result<(), PlayerError>;

    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Seconds into the current item, when known
    fn current_time(&self) -> Option<f64>;

    /// Item length in seconds, when known
    fn duration(&self) -> Option<f64>;

    fn state(&self) -> Option<WidgetState>;

    fn destroy(&mut self) -> Result<(), PlayerError>;
}

/// Constructs widgets; a session calls it at most once
pub trait WidgetFactory: Send {
    type Widget: EmbedWidget;

    fn create(&mut self, mount: &MountPoint, initial_item: &str) -> Result<Self::Widget, PlayerError>;
}

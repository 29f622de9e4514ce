//! Player session state machine
//!
//! One session per page view. Phases:
//!
//! ```text
//! Uninitialized --library ready--> LibraryReady --mount + item--> PlayerCreated
//! PlayerCreated --widget ready--> Interactive
//! any live phase --widget error--> Errored (still accepts shuffle / toggle)
//! any phase --teardown--> Closed
//! ```
//!
//! The widget is constructed at most once per session. Changing the item
//! afterwards only cues it; playback starts from `shuffle` (which runs inside
//! a user gesture) or from the user pressing play.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::VideoPoolEntry;
use crate::error::PlayerError;
use crate::library::WidgetLibrary;
use crate::shuffle::pick_shuffle;
use crate::widget::{error_message, EmbedWidget, MountPoint, WidgetFactory, WidgetState};

const INIT_FAILED_MESSAGE: &str = "播放器初始化失敗，請重新整理頁面。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    LibraryReady,
    PlayerCreated,
    Interactive,
    Errored,
    Closed,
}

/// Everything the page needs to draw the player controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub phase: SessionPhase,
    pub current_item: Option<VideoPoolEntry>,
    pub is_playing: bool,
    /// Played fraction in `[0, 1]`
    pub progress_fraction: f64,
    pub duration_seconds: f64,
    pub is_ready: bool,
    pub last_error: Option<String>,
}

pub struct PlayerSession<F: WidgetFactory> {
    library: WidgetLibrary,
    factory: F,
    widget: Option<F::Widget>,
    phase: SessionPhase,
    mount: Option<MountPoint>,
    current: Option<VideoPoolEntry>,
    /// Item id the widget currently has loaded or cued
    loaded_id: Option<String>,
    is_playing: bool,
    progress_fraction: f64,
    duration_seconds: f64,
    is_ready: bool,
    last_error: Option<String>,
}

impl<F: WidgetFactory> PlayerSession<F> {
    pub fn new(library: WidgetLibrary, factory: F) -> Self {
        let phase = if library.is_ready() {
            SessionPhase::LibraryReady
        } else {
            SessionPhase::Uninitialized
        };

        Self {
            library,
            factory,
            widget: None,
            phase,
            mount: None,
            current: None,
            loaded_id: None,
            is_playing: false,
            progress_fraction: 0.0,
            duration_seconds: 0.0,
            is_ready: false,
            last_error: None,
        }
    }

    pub fn library(&self) -> &WidgetLibrary {
        &self.library
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn current_item(&self) -> Option<&VideoPoolEntry> {
        self.current.as_ref()
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            phase: self.phase,
            current_item: self.current.clone(),
            is_playing: self.is_playing,
            progress_fraction: self.progress_fraction,
            duration_seconds: self.duration_seconds,
            is_ready: self.is_ready,
            last_error: self.last_error.clone(),
        }
    }

    /// The widget library announced itself
    pub fn on_library_ready(&mut self) -> Result<(), PlayerError> {
        if self.is_closed() {
            return Ok(());
        }
        self.library.mark_ready();
        if self.phase == SessionPhase::Uninitialized {
            self.phase = SessionPhase::LibraryReady;
        }
        self.try_create()
    }

    /// The page's mount element exists
    pub fn attach(&mut self, mount: MountPoint) -> Result<(), PlayerError> {
        if self.is_closed() || self.widget.is_some() {
            return Ok(());
        }
        self.mount = Some(mount);
        self.try_create()
    }

    /// Make `entry` the current item
    ///
    /// Before the widget exists this only records the initial item. After,
    /// a different item is cued without autoplay.
    pub fn set_item(&mut self, entry: VideoPoolEntry) -> Result<(), PlayerError> {
        if self.is_closed() {
            return Ok(());
        }

        if self.widget.is_none() {
            self.current = Some(entry);
            return self.try_create();
        }

        if self.loaded_id.as_deref() != Some(entry.id.as_str()) {
            if let Some(widget) = self.widget.as_mut() {
                widget.cue(&entry.id)?;
            }
            debug!(item_id = %entry.id, "Cued item");
            self.loaded_id = Some(entry.id.clone());
            self.is_playing = false;
            self.progress_fraction = 0.0;
            self.duration_seconds = 0.0;
        }
        self.current = Some(entry);
        Ok(())
    }

    fn try_create(&mut self) -> Result<(), PlayerError> {
        if self.widget.is_some() || !self.library.is_ready() {
            return Ok(());
        }
        let (Some(mount), Some(item)) = (self.mount.as_ref(), self.current.as_ref()) else {
            return Ok(());
        };

        match self.factory.create(mount, &item.id) {
            Ok(widget) => {
                info!(mount = %mount, item_id = %item.id, "Player widget created");
                self.loaded_id = Some(item.id.clone());
                self.widget = Some(widget);
                self.phase = SessionPhase::PlayerCreated;
                Ok(())
            }
            Err(e) => {
                warn!("Player widget creation failed: {}", e);
                self.phase = SessionPhase::Errored;
                self.is_playing = false;
                self.last_error = Some(INIT_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Widget "ready" callback
    pub fn on_widget_ready(&mut self) {
        if self.is_closed() || self.widget.is_none() {
            return;
        }
        self.is_ready = true;
        if self.phase == SessionPhase::PlayerCreated {
            self.phase = SessionPhase::Interactive;
        }
    }

    /// Widget state-change callback
    pub fn on_state_change(&mut self, state: WidgetState) {
        if self.is_closed() || self.widget.is_none() {
            return;
        }
        match state {
            WidgetState::Playing => {
                self.is_playing = true;
                if self.phase == SessionPhase::Errored && self.is_ready {
                    self.phase = SessionPhase::Interactive;
                    self.last_error = None;
                }
            }
            WidgetState::Paused | WidgetState::Ended => self.is_playing = false,
            WidgetState::Unstarted | WidgetState::Buffering | WidgetState::Cued => {}
        }
    }

    /// Widget error callback
    pub fn on_error(&mut self, code: i32) {
        if self.is_closed() {
            return;
        }
        warn!(code, "Player widget reported an error");
        self.phase = SessionPhase::Errored;
        self.is_playing = false;
        self.last_error = Some(error_message(code).to_string());
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        let is_playing = self.is_playing;
        let widget = self.ready_widget()?;
        if is_playing {
            widget.pause()
        } else {
            widget.play()
        }
    }

    /// Load and play a random pool item other than the current one
    ///
    /// Returns the chosen item, or `None` when the pool offers nothing else.
    pub fn shuffle<R: Rng + ?Sized>(
        &mut self,
        pool: &[VideoPoolEntry],
        rng: &mut R,
    ) -> Result<Option<VideoPoolEntry>, PlayerError> {
        let current_id = self
            .loaded_id
            .clone()
            .or_else(|| self.current.as_ref().map(|c| c.id.clone()));
        let Some(next) = pick_shuffle(pool, current_id.as_deref(), rng).cloned() else {
            debug!(pool = pool.len(), "Shuffle has no other item to load");
            return Ok(None);
        };

        self.ready_widget()?.load_and_play(&next.id)?;
        info!(item_id = %next.id, "Shuffled to new item");

        self.loaded_id = Some(next.id.clone());
        self.current = Some(next.clone());
        self.progress_fraction = 0.0;
        self.duration_seconds = 0.0;
        self.last_error = None;
        if self.phase == SessionPhase::Errored {
            self.phase = SessionPhase::Interactive;
        }
        Ok(Some(next))
    }

    fn ready_widget(&mut self) -> Result<&mut F::Widget, PlayerError> {
        if self.is_closed() {
            return Err(PlayerError::Closed);
        }
        if !self.is_ready {
            return Err(if self.widget.is_none() {
                PlayerError::NotCreated
            } else {
                PlayerError::NotReady
            });
        }
        self.widget.as_mut().ok_or(PlayerError::NotCreated)
    }

    /// Sample the widget clock; returns true if the view changed
    pub fn poll_progress(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        let Some(widget) = self.widget.as_ref() else {
            return false;
        };
        let Some(duration) = widget.duration().filter(|d| *d > 0.0) else {
            return false;
        };
        let fraction = (widget.current_time().unwrap_or(0.0) / duration).clamp(0.0, 1.0);

        let changed = fraction != self.progress_fraction || duration != self.duration_seconds;
        self.progress_fraction = fraction;
        self.duration_seconds = duration;
        changed
    }

    /// Destroy the widget and close the session
    ///
    /// Safe to call repeatedly; destroy failures are logged and ignored.
    pub fn teardown(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            if let Err(e) = widget.destroy() {
                debug!("Ignoring widget destroy failure: {}", e);
            }
        }
        self.phase = SessionPhase::Closed;
        self.is_playing = false;
    }
}

impl<F: WidgetFactory> Drop for PlayerSession<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

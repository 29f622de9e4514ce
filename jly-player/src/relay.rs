//! Browser relay widget
//!
//! The real widget lives in the visitor's page. [`RelayWidget`] stands in
//! for it on the server: commands go out to the page as [`RelayEvent`]s
//! (the HTTP layer streams them over SSE), and the page reports clock and
//! state readings back through [`RelayChannel::report_progress`] /
//! [`RelayChannel::report_state`], which the widget accessors return.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::error::PlayerError;
use crate::session::PlayerView;
use crate::widget::{EmbedWidget, MountPoint, WidgetFactory, WidgetState};

/// Buffered events per page before slow readers start losing old ones
pub const RELAY_CHANNEL_CAPACITY: usize = 64;

/// Instruction for the page-side widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    Create { mount: String, item_id: String },
    Cue { item_id: String },
    LoadAndPlay { item_id: String },
    Play,
    Pause,
    Destroy,
}

/// Everything streamed to the page
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Command(PlayerCommand),
    View(PlayerView),
}

impl RelayEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            RelayEvent::Command(_) => "command",
            RelayEvent::View(_) => "view",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            RelayEvent::Command(command) => serde_json::to_string(command),
            RelayEvent::View(view) => serde_json::to_string(view),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Telemetry {
    current_time: Option<f64>,
    duration: Option<f64>,
    state: Option<WidgetState>,
}

/// Event fan-out and telemetry for one page
#[derive(Debug, Clone)]
pub struct RelayChannel {
    events: broadcast::Sender<RelayEvent>,
    telemetry: Arc<RwLock<Telemetry>>,
}

impl RelayChannel {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(RELAY_CHANNEL_CAPACITY);
        Self {
            events,
            telemetry: Arc::new(RwLock::new(Telemetry::default())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }

    pub fn factory(&self) -> RelayFactory {
        RelayFactory {
            channel: self.clone(),
        }
    }

    /// Push a view to the page; dropped silently when nobody listens
    pub fn publish_view(&self, view: PlayerView) {
        let _ = self.events.send(RelayEvent::View(view));
    }

    pub fn report_progress(&self, current_time: f64, duration: f64) {
        let mut telemetry = self.telemetry.write().unwrap_or_else(PoisonError::into_inner);
        telemetry.current_time = Some(current_time.max(0.0));
        telemetry.duration = Some(duration.max(0.0));
    }

    pub fn report_state(&self, state: WidgetState) {
        self.telemetry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .state = Some(state);
    }

    fn telemetry(&self) -> Telemetry {
        *self.telemetry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.events
            .send(RelayEvent::Command(command))
            .map(|_| ())
            .map_err(|_| PlayerError::Widget("page not connected".to_string()))
    }
}

impl Default for RelayChannel {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RelayFactory {
    channel: RelayChannel,
}

impl WidgetFactory for RelayFactory {
    type Widget = RelayWidget;

    fn create(&mut self, mount: &MountPoint, initial_item: &str) -> Result<RelayWidget, PlayerError> {
        self.channel.send(PlayerCommand::Create {
            mount: mount.as_str().to_string(),
            item_id: initial_item.to_string(),
        })?;
        Ok(RelayWidget {
            channel: self.channel.clone(),
        })
    }
}

pub struct RelayWidget {
    channel: RelayChannel,
}

impl EmbedWidget for RelayWidget {
    fn cue(&mut self, item_id: &str) -> Result<(), PlayerError> {
        self.channel.send(PlayerCommand::Cue {
            item_id: item_id.to_string(),
        })
    }

    fn load_and_play(&mut self, item_id: &str) -> Result<(), PlayerError> {
        self.channel.send(PlayerCommand::LoadAndPlay {
            item_id: item_id.to_string(),
        })
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.channel.send(PlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.channel.send(PlayerCommand::Pause)
    }

    fn current_time(&self) -> Option<f64> {
        self.channel.telemetry().current_time
    }

    fn duration(&self) -> Option<f64> {
        self.channel.telemetry().duration
    }

    fn state(&self) -> Option<WidgetState> {
        self.channel.telemetry().state
    }

    fn destroy(&mut self) -> Result<(), PlayerError> {
        self.channel.send(PlayerCommand::Destroy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VideoPoolEntry;
    use crate::library::WidgetLibrary;
    use crate::session::PlayerSession;

    #[test]
    fn test_command_wire_format() {
        let json = serde_json::to_value(PlayerCommand::LoadAndPlay {
            item_id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json["command"], "load_and_play");
        assert_eq!(json["item_id"], "abc");
        assert_eq!(
            serde_json::to_value(PlayerCommand::Pause).unwrap()["command"],
            "pause"
        );
    }

    #[test]
    fn test_commands_fail_without_page() {
        let channel = RelayChannel::new();
        let mut factory = channel.factory();
        assert!(factory.create(&MountPoint::new("m"), "a").is_err());
    }

    #[test]
    fn test_session_over_relay() {
        let channel = RelayChannel::new();
        let mut rx = channel.subscribe();
        let mut session = PlayerSession::new(WidgetLibrary::new(), channel.factory());

        session.set_item(VideoPoolEntry::new("a", "A")).unwrap();
        session.attach(MountPoint::new("player-mount")).unwrap();
        session.on_library_ready().unwrap();
        session.on_widget_ready();
        session.set_item(VideoPoolEntry::new("b", "B")).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            RelayEvent::Command(PlayerCommand::Create {
                mount: "player-mount".to_string(),
                item_id: "a".to_string(),
            })
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            RelayEvent::Command(PlayerCommand::Cue {
                item_id: "b".to_string()
            })
        );

        channel.report_progress(15.0, 60.0);
        channel.report_state(WidgetState::Playing);
        assert!(session.poll_progress());
        assert_eq!(session.view().progress_fraction, 0.25);

        session.teardown();
        assert_eq!(
            rx.try_recv().unwrap(),
            RelayEvent::Command(PlayerCommand::Destroy)
        );
    }

    #[test]
    fn test_view_event_json() {
        let channel = RelayChannel::new();
        let mut rx = channel.subscribe();
        let session = PlayerSession::new(WidgetLibrary::new(), channel.factory());
        channel.publish_view(session.view());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.name(), "view");
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["phase"], "uninitialized");
        assert_eq!(json["is_playing"], false);
    }
}

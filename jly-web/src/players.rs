//! Live player sessions, one per page view
//!
//! Each session owns its relay channel and progress poller. Sessions that
//! have not been touched for [`SESSION_IDLE_TIMEOUT`] are reaped whenever a
//! new one is opened, which covers pages closed without a teardown call.

use jly_player::{
    spawn_progress_poller, MountPoint, PlayerError, PlayerSession, PlayerView, RelayChannel,
    RelayFactory, VideoPoolEntry, WidgetLibrary, WidgetState, PROGRESS_POLL_INTERVAL,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Callback reported by the page-side widget
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WidgetReport {
    LibraryReady,
    Mounted { mount: String },
    Ready,
    StateChange { state: i32 },
    Error { code: i32 },
    Progress { current_time: f64, duration: f64 },
}

pub struct PlayerHandle {
    pub id: Uuid,
    session: Arc<Mutex<PlayerSession<RelayFactory>>>,
    relay: RelayChannel,
    cancel: CancellationToken,
    last_seen: StdMutex<Instant>,
}

impl PlayerHandle {
    pub fn relay(&self) -> &RelayChannel {
        &self.relay
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    pub async fn view(&self) -> PlayerView {
        self.session.lock().await.view()
    }

    /// Apply one widget callback and broadcast the resulting view
    ///
    /// The view is broadcast even when the callback fails, so the page shows
    /// the error state.
    pub async fn report(&self, report: WidgetReport) -> Result<PlayerView, PlayerError> {
        self.touch();
        let is_progress = matches!(report, WidgetReport::Progress { .. });
        let (result, view) = {
            let mut session = self.session.lock().await;
            let result = match report {
                WidgetReport::LibraryReady => session.on_library_ready(),
                WidgetReport::Mounted { mount } => session.attach(MountPoint::new(mount)),
                WidgetReport::Ready => {
                    session.on_widget_ready();
                    Ok(())
                }
                WidgetReport::StateChange { state } => {
                    match WidgetState::from_code(state) {
                        Some(state) => {
                            self.relay.report_state(state);
                            session.on_state_change(state);
                        }
                        None => debug!(code = state, "Ignoring unknown widget state code"),
                    }
                    Ok(())
                }
                WidgetReport::Error { code } => {
                    session.on_error(code);
                    Ok(())
                }
                WidgetReport::Progress {
                    current_time,
                    duration,
                } => {
                    self.relay.report_progress(current_time, duration);
                    Ok(())
                }
            };
            (result, session.view())
        };
        // Progress changes reach the page through the poller.
        if !is_progress {
            self.relay.publish_view(view.clone());
        }
        result.map(|_| view)
    }

    pub async fn toggle(&self) -> Result<PlayerView, PlayerError> {
        self.touch();
        let view = {
            let mut session = self.session.lock().await;
            session.toggle_play_pause()?;
            session.view()
        };
        self.relay.publish_view(view.clone());
        Ok(view)
    }

    /// Shuffle to another pool item; the view is unchanged when nothing else is available
    pub async fn shuffle(&self, pool: &[VideoPoolEntry]) -> Result<PlayerView, PlayerError> {
        self.touch();
        let view = {
            let mut session = self.session.lock().await;
            let mut rng = StdRng::from_entropy();
            session.shuffle(pool, &mut rng)?;
            session.view()
        };
        self.relay.publish_view(view.clone());
        Ok(view)
    }

    pub async fn teardown(&self) -> PlayerView {
        self.cancel.cancel();
        let view = {
            let mut session = self.session.lock().await;
            session.teardown();
            session.view()
        };
        self.relay.publish_view(view.clone());
        view
    }
}

/// Result of opening a session
pub struct OpenedSession {
    pub handle: Arc<PlayerHandle>,
    /// Whether this page should inject the widget script
    pub inject_library: bool,
}

#[derive(Clone, Default)]
pub struct PlayerRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<PlayerHandle>>>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, optionally with its initial item already known
    pub async fn open(&self, initial_item: Option<VideoPoolEntry>) -> OpenedSession {
        self.reap_idle(SESSION_IDLE_TIMEOUT).await;

        let library = WidgetLibrary::new();
        let inject_library = library.ensure_injected();
        let relay = RelayChannel::new();
        let mut session = PlayerSession::new(library, relay.factory());
        if let Some(item) = initial_item {
            // Nothing is mounted yet, so this only records the item.
            if let Err(e) = session.set_item(item) {
                warn!("Initial item rejected: {}", e);
            }
        }

        let handle = Arc::new(PlayerHandle {
            id: Uuid::new_v4(),
            session: Arc::new(Mutex::new(session)),
            relay: relay.clone(),
            cancel: CancellationToken::new(),
            last_seen: StdMutex::new(Instant::now()),
        });

        spawn_progress_poller(
            handle.session.clone(),
            PROGRESS_POLL_INTERVAL,
            handle.cancel.clone(),
            move |view| relay.publish_view(view),
        );

        self.sessions.write().await.insert(handle.id, handle.clone());
        info!(session_id = %handle.id, "Player session opened");
        OpenedSession {
            handle,
            inject_library,
        }
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<PlayerHandle>> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        handle.touch();
        Some(handle)
    }

    /// Tear down and forget a session
    pub async fn close(&self, id: &Uuid) -> Option<PlayerView> {
        let handle = self.sessions.write().await.remove(id)?;
        let view = handle.teardown().await;
        info!(session_id = %id, "Player session closed");
        Some(view)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Close sessions idle for at least `max_idle`; returns how many
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let stale: Vec<Arc<PlayerHandle>> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, handle)| handle.idle_for() >= max_idle)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for handle in &stale {
            handle.teardown().await;
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "Reaped idle player sessions");
        }
        stale.len()
    }

    /// Tear down everything (server shutdown)
    pub async fn close_all(&self) {
        let handles: Vec<Arc<PlayerHandle>> =
            self.sessions.write().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            handle.teardown().await;
        }
    }
}

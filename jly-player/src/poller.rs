//! Progress polling
//!
//! The widget does not push playback position, so a task samples it on a
//! fixed interval and reports views that changed. The task ends when its
//! token is cancelled or the session closes.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::{PlayerSession, PlayerView};
use crate::widget::WidgetFactory;

pub const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Spawn the poller for `session`
///
/// `on_change` runs outside the session lock, once per tick that changed
/// the view.
pub fn spawn_progress_poller<F, O>(
    session: Arc<Mutex<PlayerSession<F>>>,
    interval: Duration,
    cancel: CancellationToken,
    mut on_change: O,
) -> JoinHandle<()>
where
    F: WidgetFactory + 'static,
    F::Widget: 'static,
    O: FnMut(PlayerView) + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let changed = {
                        let mut session = session.lock().await;
                        if session.is_closed() {
                            break;
                        }
                        session.poll_progress().then(|| session.view())
                    };
                    if let Some(view) = changed {
                        on_change(view);
                    }
                }
            }
        }
        debug!("Progress poller stopped");
    })
}

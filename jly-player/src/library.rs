//! Widget library capability
//!
//! The platform's widget script is loaded once per page view and announces
//! itself exactly once. Sessions receive a [`WidgetLibrary`] handle at
//! construction instead of probing for a global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct WidgetLibrary {
    injected: Arc<AtomicBool>,
    ready_tx: Arc<watch::Sender<bool>>,
}

impl WidgetLibrary {
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            injected: Arc::new(AtomicBool::new(false)),
            ready_tx: Arc::new(ready_tx),
        }
    }

    /// Claim the script injection
    ///
    /// Returns true only for the first caller; everyone else must not inject
    /// the script again.
    pub fn ensure_injected(&self) -> bool {
        !self.injected.swap(true, Ordering::SeqCst)
    }

    /// Record the library's ready announcement
    ///
    /// Returns true the first time; later calls are ignored.
    pub fn mark_ready(&self) -> bool {
        self.injected.store(true, Ordering::SeqCst);
        self.ready_tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// Resolve once the library is ready
    pub async fn wait_ready(&self) {
        let mut rx = self.ready_tx.subscribe();
        // The sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for WidgetLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_injection_claimed_once() {
        let library = WidgetLibrary::new();
        let clone = library.clone();
        assert!(library.ensure_injected());
        assert!(!clone.ensure_injected());
        assert!(!library.ensure_injected());
    }

    #[test]
    fn test_ready_is_one_shot() {
        let library = WidgetLibrary::new();
        assert!(!library.is_ready());
        assert!(library.mark_ready());
        assert!(!library.mark_ready());
        assert!(library.is_ready());
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_after_mark() {
        let library = WidgetLibrary::new();
        let waiter = {
            let library = library.clone();
            tokio::spawn(async move { library.wait_ready().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        library.mark_ready();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_ready should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_ready_returns_immediately_when_ready() {
        let library = WidgetLibrary::new();
        library.mark_ready();
        tokio::time::timeout(Duration::from_millis(100), library.wait_ready())
            .await
            .expect("already ready");
    }
}

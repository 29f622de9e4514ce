//! jly-player - embedded video player adapter and video catalog
//!
//! The adapter presents one uniform view (current item, playing flag,
//! progress, duration, readiness, last error) over a third-party embeddable
//! widget, and exposes toggle / shuffle on top of it. The widget itself is
//! reached only through the [`widget::EmbedWidget`] capability, so the same
//! session logic drives the browser relay in production and a recording
//! fake in tests.
//!
//! The catalog module talks to the video platform's data API to find the
//! latest upload, the subscriber count, and the pool shuffle draws from.

pub mod catalog;
pub mod error;
pub mod library;
pub mod poller;
pub mod relay;
pub mod session;
pub mod shuffle;
pub mod widget;

pub use catalog::{CatalogSnapshot, CatalogState, VideoPool, VideoPoolEntry};
pub use error::{CatalogError, PlayerError};
pub use library::WidgetLibrary;
pub use poller::{spawn_progress_poller, PROGRESS_POLL_INTERVAL};
pub use relay::{PlayerCommand, RelayChannel, RelayEvent, RelayFactory, RelayWidget};
pub use session::{PlayerSession, PlayerView, SessionPhase};
pub use widget::{EmbedWidget, MountPoint, WidgetFactory, WidgetState};

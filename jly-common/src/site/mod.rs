//! Site configuration document and the operations built on it

pub mod editor;
pub mod features;
pub mod gallery;
pub mod loader;
pub mod schema;

pub use editor::ConfigEditor;
pub use features::{FeatureToggle, FEATURE_TOGGLES};
pub use gallery::{resolve_gallery_base, Photo};
pub use loader::{load_site_config, read_public_site_config, to_pretty_json, SITE_CONFIG_FILE};
pub use schema::{
    Features, Icon, LinkEntry, SiteConfiguration, SiteText, Theme, Wallpapers, YouTubeSettings,
    CURRENT_SCHEMA_VERSION, DEFAULT_WALLPAPER_NOTE,
};

pub mod settings;

pub use settings::{CacheSettings, CorsSettings, HubSpotSettings, ServerSettings, Settings};

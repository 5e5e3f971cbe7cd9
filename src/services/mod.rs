pub mod cache;
pub mod hubspot;

pub use cache::{InMemoryCache, KeyValueCache};
pub use hubspot::HubSpotService;

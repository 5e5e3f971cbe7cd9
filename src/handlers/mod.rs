pub mod form_fields;
pub mod health;
pub mod hubspot;

pub use form_fields::FormFields;
pub use health::*;
pub use hubspot::*;

// Handlers OAuth2 ficam em src/auth/handlers.rs

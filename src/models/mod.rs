pub mod integration_item;

pub use integration_item::{IntegrationItem, HUBSPOT_CONTACT_TYPE};

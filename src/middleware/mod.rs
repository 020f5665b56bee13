pub mod extract;
pub mod tenant;

pub use extract::{ApiJson, ApiPath};
pub use tenant::Tenant;

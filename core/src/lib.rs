//! In-memory domain core of the creator marketplace: entity store,
//! conversation resolution, direct messages with read tracking, and the
//! query facade the HTTP layer talks to.

pub mod conversations;
pub mod error;
pub mod messages;
pub mod model;
pub mod queries;
mod seed;
pub mod store;

pub use error::{Error, Result};
pub use queries::Marketplace;
pub use store::Store;

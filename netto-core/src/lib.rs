pub mod calculations;
pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::ValidationError;
pub use models::*;
pub use store::ParameterStore;

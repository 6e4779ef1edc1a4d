pub mod error;
pub mod models;
pub mod resolver;

pub use error::{ResolverError, Result};
pub use models::*;
pub use resolver::Resolver;

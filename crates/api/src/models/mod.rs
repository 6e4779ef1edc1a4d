pub mod class;
pub mod name;
pub mod resolution;

pub use class::*;
pub use name::*;
pub use resolution::*;

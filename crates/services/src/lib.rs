pub mod index;
pub mod loader;

pub use index::*;
pub use loader::*;

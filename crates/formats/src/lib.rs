pub mod country_names;
pub mod loader;
pub mod topology;

pub use country_names::*;
pub use loader::*;
pub use topology::*;

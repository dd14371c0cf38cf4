pub mod autorotate;
pub mod features;
pub mod picking;
pub mod projection;
pub mod state;
pub mod world;

pub use features::*;
pub use projection::*;
pub use state::*;
pub use world::*;

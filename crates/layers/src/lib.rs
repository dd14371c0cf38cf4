pub mod display_list;
pub mod highlight;
pub mod path;
pub mod render;
pub mod symbology;

pub use display_list::*;
pub use render::*;
pub use symbology::*;

pub mod dataview;
pub mod outcome;

pub use dataview::*;
pub use outcome::*;

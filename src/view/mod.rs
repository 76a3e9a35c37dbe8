pub mod chart;
pub mod document;
pub mod format;
pub mod panel;
pub mod selector;
pub mod table;
pub mod token;

pub use chart::ChartView;
pub use document::*;
pub use panel::*;
pub use selector::*;
pub use table::*;
pub use token::*;

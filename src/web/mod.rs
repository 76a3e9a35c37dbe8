pub mod server;
pub mod api;
pub mod page;
pub mod state;

pub use server::*;
pub use page::*;
pub use state::*;

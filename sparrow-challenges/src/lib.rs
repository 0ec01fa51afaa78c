pub mod error;
pub use error::*;
pub mod route_search;
pub use route_search::*;

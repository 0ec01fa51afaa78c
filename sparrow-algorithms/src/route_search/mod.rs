pub mod sparrow_search;
pub use sparrow_search as ssa;

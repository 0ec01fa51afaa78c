mod graph_io;
pub use graph_io::*;
mod json;
pub use json::*;
mod report;
pub use report::*;

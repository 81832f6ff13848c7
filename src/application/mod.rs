//! Application layer: use cases on top of the search tree
//!
//! Layout data for renderers, text outlines and input parsing. No terminal I/O.

pub mod error;
pub mod layout;
pub mod outline;
pub mod parser;

pub use error::{ApplicationError, ApplicationResult};
pub use layout::{Edge, Layout, PlacedNode, Point};
pub use outline::{labeled_outline, TreeNodeConvert};
pub use parser::parse_values;

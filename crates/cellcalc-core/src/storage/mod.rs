//! Cell storage: the in-memory store and .cells file persistence.

mod memory;
mod parser;
mod writer;

pub use memory::MemoryStore;
pub use parser::{parse_cells, parse_cells_content};
pub use writer::{write_cells, write_cells_content};

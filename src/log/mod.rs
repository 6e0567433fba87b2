//! Reading and parsing `.ninja_log` files.

pub mod entry;
pub mod lines;
pub mod parse;

pub use entry::LogEntry;
pub use parse::load;

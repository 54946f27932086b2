pub mod outcome;
pub mod source;

pub use outcome::{load_all, LoadOutcome};
pub use source::{read_document, FileSource, StaticSource};

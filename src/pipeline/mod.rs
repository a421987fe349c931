pub mod batch;
pub mod discover;
pub mod extract;
pub mod ingest;
pub mod parse;
pub mod process;

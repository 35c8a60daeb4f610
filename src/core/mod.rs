//! Corpus records and the text heuristics applied to them

pub mod entry;
pub mod extract;
pub mod import;
pub mod index;
pub mod record;

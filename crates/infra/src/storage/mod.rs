//! Record storage adapters

pub mod json_file;

pub use json_file::{DataFile, JsonFileStore};

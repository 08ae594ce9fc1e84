//! Text editor backend: open and save plain-text files in a file store over HTTP.

pub mod config;
pub mod editor;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

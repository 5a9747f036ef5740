pub mod config;
pub mod error;
pub mod llm;
pub mod rest;
pub mod server;

pub use error::{Error, Result};

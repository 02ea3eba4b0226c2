//! Core types and utilities shared by the Game of Life engine and its driver.

pub mod types;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;

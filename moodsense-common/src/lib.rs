//! # Moodsense Common Library
//!
//! Shared code for the moodsense services including:
//! - Error and result types
//! - Bootstrap configuration loading and root folder resolution
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};

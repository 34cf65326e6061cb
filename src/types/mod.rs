//! Type definitions for ai-usage-tracker

mod error;
mod usage;

pub use error::*;
pub use usage::*;

//! Environment variable overrides
//!
//! Applied on top of the config file, one module per settings section.

mod common;
mod helio;
mod speed;

pub use common::*;
pub use helio::*;
pub use speed::*;

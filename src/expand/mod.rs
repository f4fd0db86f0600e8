//! Keyword expansion: variant generation, two-round concurrent fan-out, capped merge, and relevance filtering.

mod config;
mod engine;
mod filter;
mod set;
mod variants;

pub use config::ExpansionConfig;
pub use engine::{ExpandError, Expander};

//! Domain parameter generation
//!
//! Parameters are derived from a single public seed (the bytes of q), so
//! anyone can re-run the expansion and confirm that p was not chosen with a
//! hidden structure.

mod audit;
mod expander;
mod generate;

pub use audit::{audit, check_params};
pub use expander::{chunk_layout, counter_for_attempt, HashExpander};
pub use generate::{generate, GeneratedParams};

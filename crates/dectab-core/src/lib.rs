//! Core data structures shared across the dectab pipeline:
//! - `interner` - byte-string interning with content ordering
//! - `ordered` - always-sorted vector operations

mod interner;
pub mod ordered;

#[cfg(test)]
mod interner_tests;
#[cfg(test)]
mod ordered_tests;

pub use interner::{Interner, Symbol};

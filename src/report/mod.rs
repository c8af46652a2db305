//! Report rendering and table persistence.

pub mod generator;

pub use generator::*;

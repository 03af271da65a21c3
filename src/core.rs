//! Core functionality used across the crate.

pub mod strand;

pub use strand::Strand;

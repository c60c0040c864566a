//! The `utils` module holds definitions shared across the crate, currently
//! the error taxonomy.

pub mod error;

//! Test helpers shared across the accessorgen workspace.
//!
//! [`compilation`] fakes the host compiler for generator tests and [`env`]
//! guards process environment mutations in configuration tests.

pub mod compilation;
pub mod env;

//! # Workflows Module
//!
//! The public, user-facing layer tying [`crate::core`] and
//! [`crate::engine`] together into the two complete operations of the
//! system.
//!
//! Each workflow comes in two flavors: a typed `run` function returning
//! `Result` for library users, and a `handle` boundary function that
//! speaks the wire contract: request JSON in, a structured response
//! out, with every failure folded into `{"error": "..."}` rather than
//! propagated. Internal errors never escape a `handle` call.
//!
//! - [`generate`] - Build (or fetch from cache) a fragment aggregate for
//!   a query molecule against a reference repository
//! - [`find`] - Answer a needle substructure query against a stored
//!   aggregate

pub mod find;
pub mod generate;

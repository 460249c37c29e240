//! # Core Module
//!
//! Stateless building blocks of the fragment system: molecular data
//! models, the atom type classifier, and the exchange-format writer.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Query molecules,
//!   fragments, and the persisted aggregate record
//! - **Atom Typing** ([`typing`]) - The deterministic element/environment
//!   rule table feeding the external tool
//! - **File I/O** ([`io`]) - The node/edge exchange tables handed to the
//!   external partitioning tool
//!
//! Everything here is pure and side-effect free; orchestration, process
//! invocation and caching live in the [`crate::engine`] layer.

pub mod io;
pub mod models;
pub mod typing;

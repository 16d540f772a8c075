//! Traits and implementations backing the Cooplytics farm-management core.
//!
//! The providers talk to a hierarchical key-path store (the system of record)
//! and expose the guest access resolver, the farm-scoped chicken aggregator
//! and farm lookups on top of it.

pub mod chicken;
pub mod common_models;
pub mod farm;
pub mod guest_access;
pub mod key_path_store;
pub mod util;

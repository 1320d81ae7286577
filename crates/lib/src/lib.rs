//! localfile-lib: Core types and logic for the localfile provider
//!
//! This crate provides:
//! - `Store`: a file client confined to a single base directory
//! - `provider`: the resource, data source and request-dispatch layer that
//!   translates host calls into store operations

pub mod consts;
pub mod provider;
pub mod store;
#[cfg(test)]
mod util;

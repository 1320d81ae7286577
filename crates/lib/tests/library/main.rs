//! Integration tests for localfile-lib's public API.

mod common;
mod provider_tests;

//! Integration tests driving the provider binary over stdin/stdout.

mod common;
mod serve_tests;

//! Unit tests for the descriptor module.
//!
//! Tests are organised by concern: typed values, violations, validation
//! rules, blueprints, the text codec, the loader service and canonical
//! round trips.

mod codec_tests;
mod domain_tests;
mod loader_tests;

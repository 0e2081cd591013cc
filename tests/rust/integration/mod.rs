//! Integration tests - Tests that run whole translations
//!
//! These tests go from GraphQL text and SDL through to the Cypher statement and its
//! parameter map.

mod cypher_directive_tests;
mod schema_loading_tests;

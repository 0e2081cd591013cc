//! Unit tests - Tests that exercise public parsing APIs in isolation
//!
//! These tests need no schema or translation setup.

mod parser_robustness_tests;

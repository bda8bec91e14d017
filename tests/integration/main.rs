//! Integration tests for the analysis pipeline
//!
//! These tests use wiremock to stand in for the suggestion and search
//! endpoints and drive the full pipeline end-to-end.

mod analysis_tests;

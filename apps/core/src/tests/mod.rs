//! Test Module
//!
//! Cross-module test suite for the D2D core.
//!
//! ## Test Categories
//! - `brain_tests`: keyword, emotion and analyzer properties
//! - `database_tests`: `SqliteStore` users, dreams and ownership
//! - `imaging_tests`: provider dispatch and fallback against wiremock
//! - `api_tests`: the full router driven in-process

pub mod brain_tests;

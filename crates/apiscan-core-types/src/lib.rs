//! Core types shared across apiscan facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! macros and by tests that assert on captured log events.

pub mod schema;

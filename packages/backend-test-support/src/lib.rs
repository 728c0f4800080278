//! Shared test support for backend integration test binaries.

pub mod logging;

//! Shared helpers for fml-backend tests.

pub mod logging;

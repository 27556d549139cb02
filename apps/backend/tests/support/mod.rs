#![allow(dead_code)]

pub mod memory_store;
pub mod schema;
pub mod websocket;
pub mod websocket_client;

// Logging is auto-installed for every test binary that pulls this module in.
#[ctor::ctor]
fn init_logging() {
    fml_test_support::logging::init();
}

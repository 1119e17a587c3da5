//! HTTP proxy server

mod handler;
pub mod server;

pub use handler::{build_payload, ChatProxyHandler};
pub use server::{run_server, ProxyState};

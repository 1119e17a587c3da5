//! pantry-proxy: HTTP proxy for the Pantry Pal assistant
//!
//! Features:
//! - Stateless chat proxying to the Gemini generateContent API
//! - Fixed persona prefix injected ahead of every conversation
//! - API-key or service-account credential strategies
//! - Compact request logging with token usage metrics

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod persona;
pub mod proxy;
pub mod stats;

pub use config::AppConfig;
pub use error::ProxyError;
pub use persona::PersonaProfile;
pub use proxy::run_server;

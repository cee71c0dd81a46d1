//! Client library and CLI for the AIStaff agent dashboard API.
//!
//! The core is an authenticated HTTP client with a single-shot token
//! refresh: a 401 triggers at most one refresh-and-resend per original
//! request, everything else propagates unchanged. Around it sit a durable
//! token store, a session state machine, and typed CRUD facades for the
//! agents and marketplace resources.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod redact;
pub mod services;
pub mod session;
pub mod tokens;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, ApiRequest, ApiResponse, HttpTransport, ReqwestTransport, RequestBody};
pub use config::ApiConfig;
pub use error::ApiError;
pub use services::{AgentsApi, AuthApi, MarketplaceApi};
pub use session::{Session, SessionPhase, SessionState};
pub use tokens::{KeyringTokenStore, MemoryTokenStore, TokenPair, TokenStore};

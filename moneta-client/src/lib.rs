//! moneta-client: session-aware HTTP client for the Money Manager REST API.
//!
//! Wraps every outbound request with the bearer-token decision and every
//! response with status classification, so the command layer never handles
//! auth. Session state lives in an explicit, observable [`SessionStore`].

pub mod client;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod types;

pub use client::{ApiClient, auth_header};
pub use error::ApiError;
pub use session::{
    FileTokenStore, MemoryTokenStore, Session, SessionState, SessionStore, TokenStore,
};
pub use types::{CategoryPayload, FilterRequest, LoginRequest, LoginResponse, RegisterRequest};

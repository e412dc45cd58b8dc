//! Platform-independent routing core for the vidgate edge gateway.
//!
//! The gateway classifies each request path into one of four dispositions
//! (static asset, API proxy, root, not found) and delegates to injected
//! origin clients, so the same router runs unchanged under the local dev
//! adapter and on Cloudflare Workers.

pub mod body;
pub mod config;
pub mod error;
pub mod http;
pub mod origin;
pub mod response;
pub mod route;
pub mod router;

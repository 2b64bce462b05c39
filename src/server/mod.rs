//! Server module for building the HTTP server
//!
//! This module provides:
//! - `ServerHost`, the shared state handed to every handler
//! - the route table and its handlers
//! - `ServerBuilder`, which wires a catalog store and a configuration together

pub mod builder;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use router::{build_api_routes, build_router};

//! Core library for authenticated GraphQL fetching: token stores, request decoration,
//! error-envelope inspection, and a replayable response.

mod client;
mod config;
mod decorator;
mod error;
mod inspector;
mod response;
pub mod token;

pub use client::{FetchClient, GraphQLRequest};
pub use config::{ClientConfig, MissingToken};
pub use decorator::{merge_headers, FetchOptions, APOLLO_REQUIRE_PREFLIGHT};
pub use error::{ErrorCode, FetchError, GraphQLError, Result};
pub use inspector::{extract_error, inspect, ResponseBody};
pub use response::BufferedResponse;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY};

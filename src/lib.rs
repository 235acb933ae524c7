//! # urgentcargus - UrgentCargus courier API client for Rust
//!
//! A blocking client for the UrgentCargus REST API. It takes care of the
//! subscription key, bearer token login and caching, and turns transport
//! and service failures into a single error type.
//!
//! Endpoints and payloads are passed through as JSON; the client does not
//! model shipments, AWBs or any other API resource.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use urgentcargus::{json, Client};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new("subscription-key", None)?;
//!
//!     // Log in once; the token is cached and sent with later requests
//!     client.get_token("username", "password")?;
//!
//!     let countries = client.get("Countries", &json!({}), None)?;
//!     println!("{:?}", countries);
//!     Ok(())
//! }
//! ```
//!
//! ## Typed responses
//!
//! ```no_run
//! use serde::Deserialize;
//! use urgentcargus::{json, Client, Method};
//!
//! #[derive(Deserialize)]
//! struct County {
//!     #[serde(rename = "CountyId")]
//!     id: i64,
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//!
//! let mut client = Client::new("subscription-key", None)?;
//! client.set_access_token(Some("token".to_string()));
//!
//! let counties: Vec<County> = client.apply(Method::Get, "Counties?countryId=1", &json!({}))?;
//! # Ok::<(), urgentcargus::CargusError>(())
//! ```
//!
//! ## Errors
//!
//! Failed requests surface as [`CargusError::Request`], carrying the message
//! reported by the service and the HTTP status (0 when there was no response).

pub mod client;
pub mod error;
pub mod method;
pub mod response;
pub mod rest;
pub mod token;

// Re-export main types for convenience
pub use client::{Config, API_URI, VERSION};
pub use error::{CargusError, Result};
pub use method::Method;
pub use response::value_at;
pub use rest::{Client, DeprecationHook};

// Re-export serde_json for convenience
pub use serde_json::json;

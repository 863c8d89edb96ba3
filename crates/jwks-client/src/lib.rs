//! Resolve JWT signing keys by `kid` from a remote JSON Web Key Set.
//!
//! ```no_run
//! use jwks_client::{CacheOptions, ClientOptions, JwksClient, RateLimitOptions};
//!
//! # async fn run() -> jwks_client::Result<()> {
//! let mut options = ClientOptions::new("https://example.com/.well-known/jwks.json");
//! options
//!     .cache(CacheOptions::default())
//!     .rate_limit(RateLimitOptions::default());
//!
//! let client = JwksClient::new(options)?;
//! let key = client.get_signing_key("my-kid").await?;
//! println!("{}", key.public_key());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod jwks;

// Internal modules
pub(crate) mod caching;
pub(crate) mod limits;
pub(crate) mod rate_limit;
pub(crate) mod resolver;
pub(crate) mod url;
pub(crate) mod utils;

// Public Interface
pub use client::JwksClient;
pub use config::{CacheOptions, ClientOptions, RateLimitOptions, RateLimitScope, TransportOptions};
pub use error::{Error, ErrorKind, Result};
pub use jwks::jwk::Jwk;
pub use jwks::signing_key::{SigningKey, extract_signing_keys};
pub use resolver::SigningKeyResolver;

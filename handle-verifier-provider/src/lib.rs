//! # handle-verifier-provider
//!
//! Remote account directory abstraction for fediverse handles of the form
//! `user@server.example`.
//!
//! The crate owns three things:
//!
//! - [`Handle`]: syntactic parsing and canonical formatting of a handle.
//! - [`AccountDirectory`]: the remote capability a validator needs: does the
//!   account exist, is the server a compatible one at all, and a prefetch of
//!   the remote-follow ("subscribe") template.
//! - [`FediverseDirectory`]: an HTTP implementation backed by WebFinger
//!   (RFC 7033) and the Mastodon instance endpoint.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use handle_verifier_provider::{AccountDirectory, DirectoryConfig, FediverseDirectory, Handle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let directory = FediverseDirectory::new(DirectoryConfig::default())?;
//!     let handle = Handle::parse("alice@example.social")?;
//!
//!     match directory.lookup_account(&handle).await {
//!         Ok(account) => println!("found {}", account.subject),
//!         Err(e) if e.is_not_found() => {
//!             let compatible = directory.is_compatible_server(handle.server_host()).await?;
//!             println!("no such account (compatible server: {compatible})");
//!         }
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All directory operations return [`Result<T, LookupError>`](LookupError):
//!
//! - [`LookupError::AccountNotFound`]: the server answered, the account does not exist
//! - [`LookupError::NetworkError`] / [`LookupError::Timeout`]: transport failure (retryable)
//! - [`LookupError::RateLimited`]: HTTP 429 (retryable)
//!
//! Transient errors are automatically retried with exponential backoff, up to
//! [`DirectoryConfig::max_retries`] times.

mod directory;
mod error;
mod handle;
mod http_client;
mod traits;
mod types;
mod utils;

pub use error::{LookupError, Result};

pub use handle::{Handle, HandleParseError};

pub use traits::AccountDirectory;

pub use types::{AccountLookup, DirectoryConfig, WebFingerLink, WebFingerResponse};

pub use directory::FediverseDirectory;

/// Link relation that carries the remote-follow template in a WebFinger response.
pub const SUBSCRIBE_REL: &str = "http://ostatus.org/schema/1.0/subscribe";

/// Link relation for the account's HTML profile page.
pub const PROFILE_PAGE_REL: &str = "http://webfinger.net/rel/profile-page";

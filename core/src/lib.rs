//! Core components for signing AWS requests.
//!
//! This crate provides the service-agnostic building blocks shared by the
//! signers in the amzsign workspace. It knows nothing about canonical request
//! rules or signature algorithms; those live in the service crates.
//!
//! ## Overview
//!
//! - **SigningRequest**: an adapter over [`http::request::Parts`] that the signers read
//!   and mutate. Nothing is written back to the caller's request until
//!   [`SigningRequest::apply`] is called, so a failed signing leaves it untouched.
//! - **SignableBody**: how the signer may observe the request body (in memory,
//!   seekable, streaming or with a precomputed digest).
//! - **Traits**: [`SignRequest`] for request signers and [`SigningCredential`] for
//!   the credentials they consume.
//!
//! ## Example
//!
//! ```
//! use amzsign_core::{Result, SignRequest, SignableBody, SigningCredential, SigningMethod, SigningRequest};
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct BearerSigner;
//!
//! impl SignRequest for BearerSigner {
//!     type Credential = Token;
//!
//!     fn sign_request(
//!         &self,
//!         req: &mut Parts,
//!         _body: SignableBody<'_>,
//!         credential: Option<&Self::Credential>,
//!         _method: SigningMethod,
//!     ) -> Result<()> {
//!         let Some(token) = credential else {
//!             return Ok(());
//!         };
//!         let mut signing = SigningRequest::build(req)?;
//!         signing
//!             .headers
//!             .insert(http::header::AUTHORIZATION, format!("Bearer {}", token.0).parse()?);
//!         signing.apply(req)
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let (mut parts, _) = http::Request::get("https://example.com/")
//!     .body(())
//!     .expect("request must be valid")
//!     .into_parts();
//! BearerSigner.sign_request(
//!     &mut parts,
//!     SignableBody::Bytes(b""),
//!     Some(&Token("token".to_string())),
//!     SigningMethod::Header,
//! )?;
//! assert!(parts.headers.contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting used in signatures
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{SignRequest, SigningCredential};
mod body;
pub use body::{ReadSeek, SignableBody};
mod request;
pub use request::{SigningMethod, SigningRequest};

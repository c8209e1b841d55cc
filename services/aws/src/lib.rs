//! AWS SigV4 and SigV4A request signer
//!
//! This crate signs [`http::request::Parts`] in place for AWS services:
//!
//! - [`RequestSigner`]: SigV4, HMAC-SHA256 signatures scoped to one region.
//! - [`RequestSignerV4a`]: SigV4A, ECDSA P-256 signatures valid for a region set.
//!
//! Credential loading is left to the caller: signers take a [`Credential`]
//! per call and never cache it.
//!
//! # Example
//!
//! ```
//! use amzsign_aws::{Credential, RequestSigner, SigningConfig};
//! use amzsign_core::{Result, SignRequest, SignableBody, SigningMethod};
//!
//! # fn main() -> Result<()> {
//! let signer = RequestSigner::new("dynamodb", "us-east-1")
//!     .with_config(SigningConfig::default().with_add_payload_hash_header(true));
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let body = br#"{"TableName":"example"}"#;
//! let (mut parts, _) = http::Request::post("https://dynamodb.us-east-1.amazonaws.com/")
//!     .header("x-amz-target", "DynamoDB_20120810.DescribeTable")
//!     .body(())
//!     .expect("request must be valid")
//!     .into_parts();
//!
//! signer.sign_request(
//!     &mut parts,
//!     SignableBody::Bytes(body),
//!     Some(&cred),
//!     SigningMethod::Header,
//! )?;
//! assert!(parts.headers.contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::EMPTY_STRING_SHA256;

mod config;
pub use config::AllHeaders;
pub use config::AllowList;
pub use config::AnyOf;
pub use config::HeaderRules;
pub use config::MandatoryOnly;
pub use config::Patterns;
pub use config::SigningConfig;

mod credential;
pub use credential::Credential;

mod payload;
pub use payload::PayloadHash;
pub use payload::UNSIGNED_PAYLOAD;

mod random;
pub use random::OsRandom;
pub use random::RandomSource;

mod canonical;
mod sign_request;

mod v4;
pub use v4::generate_signing_key;
pub use v4::RequestSigner;

mod v4a;
pub use v4a::derive_verifying_key;
pub use v4a::RequestSignerV4a;

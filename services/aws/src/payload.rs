// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use amzsign_core::hash::{hex_sha256, hex_sha256_reader};
use amzsign_core::{Error, ReadSeek, Result, SignableBody};
use http::HeaderValue;
use std::io::SeekFrom;

/// Sentinel used in place of a payload hash when the body is not signed.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// PayloadHash is the value used as the last line of the canonical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadHash {
    /// The body is not part of the signature.
    Unsigned,
    /// Hex encoded SHA256 of the body, or any other literal the service
    /// expects verbatim (for example S3's streaming sentinels).
    Sha256(String),
}

impl PayloadHash {
    /// The string embedded into the canonical request.
    pub fn as_str(&self) -> &str {
        match self {
            PayloadHash::Unsigned => UNSIGNED_PAYLOAD,
            PayloadHash::Sha256(v) => v,
        }
    }

    fn from_literal(v: &str) -> Self {
        if v == UNSIGNED_PAYLOAD {
            PayloadHash::Unsigned
        } else {
            PayloadHash::Sha256(v.to_string())
        }
    }
}

/// Resolve the payload hash for a request.
///
/// In order of precedence:
///
/// 1. a hash precomputed by the caller,
/// 2. an `x-amz-content-sha256` header already on the request,
/// 3. `UNSIGNED-PAYLOAD` when implicit hashing is disabled,
/// 4. SHA256 of an in-memory or seekable body.
///
/// A streaming body can't be hashed without consuming it, so it is rejected
/// instead of being buffered or silently left unsigned.
pub fn resolve_payload_hash(
    body: SignableBody<'_>,
    existing_header: Option<&HeaderValue>,
    disable_implicit_payload_hashing: bool,
) -> Result<PayloadHash> {
    if let SignableBody::Precomputed(hash) = &body {
        return Ok(PayloadHash::from_literal(hash));
    }

    if let Some(value) = existing_header {
        return Ok(PayloadHash::from_literal(value.to_str()?));
    }
    if disable_implicit_payload_hashing {
        return Ok(PayloadHash::Unsigned);
    }

    match body {
        SignableBody::Bytes(bs) => Ok(PayloadHash::Sha256(hex_sha256(bs))),
        SignableBody::Seekable(reader) => hash_seekable(reader).map(PayloadHash::Sha256),
        SignableBody::Streaming => Err(Error::request_invalid(
            "cannot hash unseekable body: provide a precomputed payload hash or disable implicit payload hashing",
        )),
        SignableBody::Precomputed(hash) => Ok(PayloadHash::from_literal(&hash)),
    }
}

/// Hash the body from its current position, then seek back to that position.
fn hash_seekable(reader: &mut dyn ReadSeek) -> Result<String> {
    let start = reader
        .stream_position()
        .map_err(|e| Error::request_invalid("failed to get body position").with_source(e))?;

    let hashed = hex_sha256_reader(reader);
    let rewound = reader.seek(SeekFrom::Start(start));

    let hash = hashed
        .map_err(|e| Error::request_invalid("failed to read body for hashing").with_source(e))?;
    rewound.map_err(|e| {
        Error::request_invalid("failed to rewind body after hashing, it can't be sent anymore")
            .with_source(e)
    })?;

    Ok(hash)
}

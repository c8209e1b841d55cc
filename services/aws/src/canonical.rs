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

use std::fmt::{Display, Formatter, Write};

use amzsign_core::hash::hex_sha256;
use amzsign_core::time::{format_iso8601, DateTime};
use amzsign_core::{Result, SigningMethod, SigningRequest};
use http::header::HOST;
use http::HeaderName;
use percent_encoding::{percent_decode_str, percent_encode, utf8_percent_encode};

use crate::config::SigningConfig;
use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, X_AMZ_PREFIX};
use crate::payload::PayloadHash;

/// Canonical form of a request as described in
/// [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request).
///
/// Rendered through [`Display`]:
///
/// ```text
/// <method>
/// <canonical uri>
/// <canonical query>
/// <name>:<value>      (one line per signed header)
///
/// <signed headers>
/// <payload hash>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CanonicalRequest {
    method: String,
    path: String,
    query: String,
    headers: Vec<(HeaderName, String)>,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request out of the signing context.
    ///
    /// In query mode the signing parameters must already be pushed into
    /// `req.query` so they become part of the canonical query.
    pub(crate) fn build(
        req: &SigningRequest,
        method: SigningMethod,
        payload_hash: &PayloadHash,
        config: &SigningConfig,
    ) -> Result<Self> {
        let names = signed_header_names(req, method, config);

        let mut headers = Vec::with_capacity(names.len());
        for name in names {
            let value = req.header_value_normalized(&name)?;
            headers.push((name, value));
        }
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        Ok(Self {
            method: req.method.to_string(),
            path: canonical_uri(req, config.disable_double_path_escape),
            query: canonical_query(req),
            headers,
            signed_headers,
            payload_hash: payload_hash.as_str().to_string(),
        })
    }

    /// Sorted, `;` joined names of the signed headers.
    pub(crate) fn signed_headers(&self) -> &str {
        &self.signed_headers
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}:{}", name.as_str(), value)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Names of the headers that take part in the signature, sorted.
///
/// - `host` is always signed.
/// - With [`SigningMethod::Header`] every `x-amz-*` header is signed.
/// - Other headers are signed when the configured rules accept them.
pub(crate) fn signed_header_names(
    req: &SigningRequest,
    method: SigningMethod,
    config: &SigningConfig,
) -> Vec<HeaderName> {
    let mut names = req
        .headers
        .keys()
        .filter(|name| {
            *name == HOST
                || (method == SigningMethod::Header && name.as_str().starts_with(X_AMZ_PREFIX))
                || config.is_optional_header_signed(name)
        })
        .cloned()
        .collect::<Vec<_>>();
    names.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));

    names
}

/// Build the string to sign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub(crate) fn string_to_sign(
    algorithm: &str,
    time: DateTime,
    scope: &str,
    creq: &CanonicalRequest,
) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "{algorithm}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(creq.to_string().as_bytes()))?;

    Ok(f)
}

/// Each segment is decoded to raw bytes and escaped again on its own, so an
/// escaped `/` stays inside its segment and non UTF-8 bytes survive.
fn canonical_uri(req: &SigningRequest, disable_double_path_escape: bool) -> String {
    let path = if req.path.is_empty() { "/" } else { req.path.as_str() };

    let encoded = path
        .split('/')
        .map(|segment| {
            let raw = percent_decode_str(segment).collect::<Vec<u8>>();
            percent_encode(&raw, &AWS_QUERY_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/");
    if disable_double_path_escape {
        encoded
    } else {
        utf8_percent_encode(&encoded, &AWS_URI_ENCODE_SET).to_string()
    }
}

fn canonical_query(req: &SigningRequest) -> String {
    let mut pairs = req
        .query_pairs()
        .into_iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(&v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    // Sort on the encoded form, which is the byte order AWS compares.
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

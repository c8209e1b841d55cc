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

//! Signing flow shared by SigV4 and SigV4A.

use http::header::{AUTHORIZATION, HOST};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::time::Duration;

use amzsign_core::time::{format_iso8601, DateTime};
use amzsign_core::{Result, SignableBody, SigningMethod, SigningRequest};

use crate::canonical::{signed_header_names, string_to_sign, CanonicalRequest};
use crate::config::SigningConfig;
use crate::constants::*;
use crate::payload::resolve_payload_hash;
use crate::Credential;

/// Algorithm specific inputs of a signing call.
pub(crate) struct SigningParams<'a> {
    /// `AWS4-HMAC-SHA256` or `AWS4-ECDSA-P256-SHA256`.
    pub algorithm: &'static str,
    /// Credential scope without the access key id.
    pub scope: String,
    /// Comma joined region set, SigV4A only.
    pub region_set: Option<&'a str>,
    pub config: &'a SigningConfig,
    pub time: DateTime,
}

/// Sign `req` and write the signature into its headers or query.
///
/// `signature` turns the string to sign into the hex encoded signature.
/// The request is only modified once everything succeeded.
pub(crate) fn sign_parts(
    req: &mut Parts,
    body: SignableBody<'_>,
    cred: &Credential,
    method: SigningMethod,
    params: &SigningParams<'_>,
    signature: impl FnOnce(&str) -> Result<String>,
) -> Result<()> {
    cred.check(params.time)?;

    let mut ctx = SigningRequest::build(req)?;
    let payload_hash = resolve_payload_hash(
        body,
        ctx.headers.get(X_AMZ_CONTENT_SHA_256),
        params.config.disable_implicit_payload_hashing,
    )?;

    let host = ctx.host()?;
    ctx.headers.insert(HOST, host);

    match method {
        SigningMethod::Header => {
            canonicalize_header(&mut ctx, cred, params, payload_hash.as_str())?
        }
        SigningMethod::Query(expires_in) => {
            canonicalize_query(&mut ctx, cred, params, expires_in)
        }
    }

    let creq = CanonicalRequest::build(&ctx, method, &payload_hash, params.config)?;
    debug!("calculated scope: {}", params.scope);
    debug!("calculated signed headers: {}", creq.signed_headers());

    let string_to_sign = string_to_sign(params.algorithm, params.time, &params.scope, &creq)?;
    debug!("calculated string to sign: {string_to_sign}");

    let signature = signature(&string_to_sign)?;

    match method {
        SigningMethod::Header => {
            let mut authorization = HeaderValue::from_str(&format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                params.algorithm,
                cred.access_key_id,
                params.scope,
                creq.signed_headers(),
                signature
            ))?;
            authorization.set_sensitive(true);

            ctx.headers.insert(AUTHORIZATION, authorization);
        }
        SigningMethod::Query(_) => ctx.query_push(X_AMZ_SIGNATURE_PARAM, signature),
    }

    ctx.apply(req)
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    params: &SigningParams<'_>,
    payload_hash: &str,
) -> Result<()> {
    ctx.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(params.time))?);

    match &cred.session_token {
        Some(token) => {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to avoid leaking.
            value.set_sensitive(true);

            ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
        // Left over from signing with a different credential.
        None => {
            ctx.headers.remove(X_AMZ_SECURITY_TOKEN);
        }
    }

    match params.region_set {
        Some(region_set) => {
            ctx.headers
                .insert(X_AMZ_REGION_SET, HeaderValue::from_str(region_set)?);
        }
        // Left over from a previous SigV4A signing.
        None => {
            ctx.headers.remove(X_AMZ_REGION_SET);
        }
    }

    if params.config.add_payload_hash_header {
        ctx.headers
            .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(payload_hash)?);
    }

    Ok(())
}

fn canonicalize_query(
    ctx: &mut SigningRequest,
    cred: &Credential,
    params: &SigningParams<'_>,
    expires_in: Option<Duration>,
) {
    ctx.query_retain(|k| !SIGNING_QUERY_PARAMS.contains(&k));

    let method = SigningMethod::Query(expires_in);
    let signed_headers = signed_header_names(ctx, method, params.config)
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let mut push = |k: &str, v: &str| {
        ctx.query_push(k, utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string())
    };

    push(X_AMZ_ALGORITHM_PARAM, params.algorithm);
    push(
        X_AMZ_CREDENTIAL_PARAM,
        &format!("{}/{}", cred.access_key_id, params.scope),
    );
    push(X_AMZ_DATE_PARAM, &format_iso8601(params.time));
    if let Some(expires_in) = expires_in {
        push(X_AMZ_EXPIRES_PARAM, &expires_in.as_secs().to_string());
    }
    if let Some(region_set) = params.region_set {
        push(X_AMZ_REGION_SET_PARAM, region_set);
    }
    push(X_AMZ_SIGNED_HEADERS_PARAM, &signed_headers);
    if let Some(token) = &cred.session_token {
        push(X_AMZ_SECURITY_TOKEN_PARAM, token);
    }
}

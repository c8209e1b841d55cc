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

use crate::constants::IGNORED_HEADERS;
use http::HeaderName;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// HeaderRules decides which optional headers join the signed header set.
///
/// `host` and, in header mode, every `x-amz-*` header are signed regardless
/// of the rules. `authorization`, `user-agent`, `x-amzn-trace-id` and `expect`
/// are never signed. Rules only decide about the rest.
///
/// Any `Fn(&HeaderName) -> bool` is a valid rule:
///
/// ```
/// use amzsign_aws::SigningConfig;
///
/// let config = SigningConfig::default()
///     .with_header_rules(|name: &http::HeaderName| name.as_str().starts_with("content-"));
/// ```
pub trait HeaderRules: Send + Sync + 'static {
    /// Whether `name` should be signed.
    fn is_signed(&self, name: &HeaderName) -> bool;
}

impl<F> HeaderRules for F
where
    F: Fn(&HeaderName) -> bool + Send + Sync + 'static,
{
    fn is_signed(&self, name: &HeaderName) -> bool {
        self(name)
    }
}

/// Sign nothing beyond the mandatory headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandatoryOnly;

impl HeaderRules for MandatoryOnly {
    fn is_signed(&self, _: &HeaderName) -> bool {
        false
    }
}

/// Sign every header present on the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllHeaders;

impl HeaderRules for AllHeaders {
    fn is_signed(&self, _: &HeaderName) -> bool {
        true
    }
}

/// Sign headers whose name is in the list, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList(Vec<String>);

impl AllowList {
    /// Create a new allow list.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|v| v.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }
}

impl HeaderRules for AllowList {
    fn is_signed(&self, name: &HeaderName) -> bool {
        self.0.iter().any(|v| v == name.as_str())
    }
}

/// Sign headers whose name starts with one of the prefixes, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Patterns(Vec<String>);

impl Patterns {
    /// Create a new prefix matcher.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            prefixes
                .into_iter()
                .map(|v| v.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }
}

impl HeaderRules for Patterns {
    fn is_signed(&self, name: &HeaderName) -> bool {
        self.0.iter().any(|v| name.as_str().starts_with(v.as_str()))
    }
}

/// Sign a header if any of the inner rules signs it.
#[derive(Clone, Default)]
pub struct AnyOf(Vec<Arc<dyn HeaderRules>>);

impl AnyOf {
    /// Create an empty union, which signs nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule to the union.
    pub fn with(mut self, rule: impl HeaderRules) -> Self {
        self.0.push(Arc::new(rule));
        self
    }
}

impl Debug for AnyOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyOf")
            .field("rules", &self.0.len())
            .finish()
    }
}

impl HeaderRules for AnyOf {
    fn is_signed(&self, name: &HeaderName) -> bool {
        self.0.iter().any(|rule| rule.is_signed(name))
    }
}

/// Configuration shared by the SigV4 and SigV4A signers.
#[derive(Clone)]
pub struct SigningConfig {
    /// Rules deciding which optional headers are signed.
    ///
    /// Default to [`MandatoryOnly`].
    pub header_rules: Arc<dyn HeaderRules>,
    /// Use `UNSIGNED-PAYLOAD` instead of hashing the body when the caller
    /// didn't provide a payload hash.
    pub disable_implicit_payload_hashing: bool,
    /// Escape the canonical path once instead of twice.
    ///
    /// S3 requires this.
    pub disable_double_path_escape: bool,
    /// Send the payload hash in `x-amz-content-sha256` when signing with headers.
    pub add_payload_hash_header: bool,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            header_rules: Arc::new(MandatoryOnly),
            disable_implicit_payload_hashing: false,
            disable_double_path_escape: false,
            add_payload_hash_header: false,
        }
    }
}

impl Debug for SigningConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field(
                "disable_implicit_payload_hashing",
                &self.disable_implicit_payload_hashing,
            )
            .field("disable_double_path_escape", &self.disable_double_path_escape)
            .field("add_payload_hash_header", &self.add_payload_hash_header)
            .finish_non_exhaustive()
    }
}

impl SigningConfig {
    /// Configuration expected by S3: single path escaping and an
    /// `x-amz-content-sha256` header.
    pub fn s3() -> Self {
        Self::default()
            .with_disable_double_path_escape(true)
            .with_add_payload_hash_header(true)
    }

    /// Replace the header rules.
    pub fn with_header_rules(mut self, rules: impl HeaderRules) -> Self {
        self.header_rules = Arc::new(rules);
        self
    }

    /// Set `disable_implicit_payload_hashing`.
    pub fn with_disable_implicit_payload_hashing(mut self, v: bool) -> Self {
        self.disable_implicit_payload_hashing = v;
        self
    }

    /// Set `disable_double_path_escape`.
    pub fn with_disable_double_path_escape(mut self, v: bool) -> Self {
        self.disable_double_path_escape = v;
        self
    }

    /// Set `add_payload_hash_header`.
    pub fn with_add_payload_hash_header(mut self, v: bool) -> Self {
        self.add_payload_hash_header = v;
        self
    }

    /// Whether an optional header present on the request should be signed.
    pub(crate) fn is_optional_header_signed(&self, name: &HeaderName) -> bool {
        !IGNORED_HEADERS.contains(&name.as_str()) && self.header_rules.is_signed(name)
    }
}

use std::str::FromStr;
use std::time::Duration;

use http::header::HeaderName;
use http::header::HOST;
use http::request::Parts;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::percent_decode_str;

use crate::{Error, Result};

/// Signing context for request.
///
/// Built by cloning what the signer needs out of [`Parts`]. Signers mutate this
/// value freely and call [`SigningRequest::apply`] once everything succeeded.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded as it appears on the request.
    pub path: String,
    /// Raw query string exactly as it appears on the request.
    pub query: Option<String>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// Requests in origin form (no authority in the uri) fall back to the
    /// `Host` header.
    pub fn build(parts: &Parts) -> Result<Self> {
        let authority = match parts.uri.authority() {
            Some(authority) => authority.clone(),
            None => {
                let host = parts.headers.get(HOST).ok_or_else(|| {
                    Error::request_invalid("request without authority is invalid for signing")
                })?;
                Authority::from_str(host.to_str()?)?
            }
        };

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: parts.uri.scheme().cloned().unwrap_or(Scheme::HTTP),
            authority,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Method, scheme, authority and path are never changed. The uri is only
    /// rebuilt when the query string differs from the request's.
    pub fn apply(self, parts: &mut Parts) -> Result<()> {
        if parts.uri.query() != self.query.as_deref() {
            let path = if self.path.is_empty() {
                "/"
            } else {
                self.path.as_str()
            };
            let paq = match &self.query {
                Some(query) => format!("{path}?{query}"),
                None => path.to_string(),
            };

            let mut uri_parts = parts.uri.clone().into_parts();
            uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
            parts.uri = Uri::from_parts(uri_parts)?;
        }

        parts.headers = self.headers;
        Ok(())
    }

    /// Value of the `Host` header the request will be sent with.
    ///
    /// An existing `Host` header wins. Otherwise the authority is used, with
    /// the scheme's default port stripped the same way HTTP clients do on
    /// the wire.
    pub fn host(&self) -> Result<HeaderValue> {
        if let Some(host) = self.headers.get(HOST) {
            return Ok(host.clone());
        }

        let host = match (self.scheme.as_str(), self.authority.port_u16()) {
            ("http", Some(80)) | ("https", Some(443)) => self.authority.host(),
            _ => self.authority.as_str(),
        };
        Ok(HeaderValue::from_str(host)?)
    }

    /// Get decoded query pairs in their original order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push an already encoded pair at the end of the query string.
    pub fn query_push(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        let query = self.query.get_or_insert_with(String::new);
        if !query.is_empty() {
            query.push('&');
        }

        query.push_str(key.as_ref());
        query.push('=');
        query.push_str(value.as_ref());
    }

    /// Retain only the query segments whose decoded key matches `filter`.
    ///
    /// Retained segments keep their exact bytes and relative order.
    pub fn query_retain(&mut self, filter: impl Fn(&str) -> bool) {
        let Some(query) = self.query.as_deref() else {
            return;
        };

        let segments = query.split('&').collect::<Vec<_>>();
        let retained = segments
            .iter()
            .filter(|segment| {
                let key = segment.split_once('=').map_or(**segment, |(k, _)| k);
                filter(&percent_decode_str(key).decode_utf8_lossy())
            })
            .copied()
            .collect::<Vec<_>>();

        // Leave the raw string alone unless something was actually dropped.
        if retained.len() == segments.len() {
            return;
        }

        self.query = if retained.is_empty() {
            None
        } else {
            Some(retained.join("&"))
        };
    }

    /// Get all values of a header normalized for signing.
    ///
    /// Each value is trimmed and runs of inner whitespace collapse into a
    /// single space. Multiple values are joined with `,`. Values may carry
    /// any UTF-8 text; other non ASCII bytes are rejected.
    pub fn header_value_normalized(&self, name: &HeaderName) -> Result<String> {
        let mut values = Vec::new();
        for value in self.headers.get_all(name) {
            let value = std::str::from_utf8(value.as_bytes()).map_err(|err| {
                Error::request_invalid(format!("header {name} is not valid utf-8"))
                    .with_source(err)
            })?;
            values.push(
                value
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        Ok(values.join(","))
    }
}

/// SigningMethod decides where the signature is transmitted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query, optionally limiting how long the url stays valid.
    Query(Option<Duration>),
}

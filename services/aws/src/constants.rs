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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Algorithms
pub const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";
pub const AWS4_ECDSA_P256_SHA256: &str = "AWS4-ECDSA-P256-SHA256";
pub const AWS4_REQUEST: &str = "aws4_request";

// Headers used in aws services.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const X_AMZ_REGION_SET: &str = "x-amz-region-set";
pub const X_AMZ_PREFIX: &str = "x-amz-";

// Query params used in presigned urls.
pub const X_AMZ_ALGORITHM_PARAM: &str = "X-Amz-Algorithm";
pub const X_AMZ_CREDENTIAL_PARAM: &str = "X-Amz-Credential";
pub const X_AMZ_DATE_PARAM: &str = "X-Amz-Date";
pub const X_AMZ_EXPIRES_PARAM: &str = "X-Amz-Expires";
pub const X_AMZ_REGION_SET_PARAM: &str = "X-Amz-Region-Set";
pub const X_AMZ_SECURITY_TOKEN_PARAM: &str = "X-Amz-Security-Token";
pub const X_AMZ_SIGNATURE_PARAM: &str = "X-Amz-Signature";
pub const X_AMZ_SIGNED_HEADERS_PARAM: &str = "X-Amz-SignedHeaders";

/// Query params written by a previous signing of the same request.
pub const SIGNING_QUERY_PARAMS: &[&str] = &[
    X_AMZ_ALGORITHM_PARAM,
    X_AMZ_CREDENTIAL_PARAM,
    X_AMZ_DATE_PARAM,
    X_AMZ_EXPIRES_PARAM,
    X_AMZ_REGION_SET_PARAM,
    X_AMZ_SECURITY_TOKEN_PARAM,
    X_AMZ_SIGNATURE_PARAM,
    X_AMZ_SIGNED_HEADERS_PARAM,
];

/// Headers that are never signed, whatever the header rules say.
///
/// They are rewritten by proxies or by the transport after signing.
pub const IGNORED_HEADERS: &[&str] = &["authorization", "user-agent", "x-amzn-trace-id", "expect"];

/// Hex encoded SHA256 of an empty payload.
pub const EMPTY_STRING_SHA256: &str = amzsign_core::hash::EMPTY_STRING_SHA256;

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query and inside a single path segment.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

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

use super::*;
use amzsign_aws::{derive_verifying_key, RandomSource, RequestSignerV4a, SigningConfig};
use amzsign_core::hash::{hex_sha256, EMPTY_STRING_SHA256};
use amzsign_core::{ErrorKind, SignRequest, SignableBody, SigningMethod};
use http::header::AUTHORIZATION;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::Signature;
use pretty_assertions::assert_eq;
use std::time::Duration;

struct Unavailable;

impl RandomSource for Unavailable {
    fn try_fill_bytes(&self, _: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::other(
            "getrandom: this target is not supported",
        )))
    }
}

fn verify(string_to_sign: &str, signature: &str) -> Result<()> {
    let key = derive_verifying_key("AKIDEXAMPLE", SUITE_SECRET)?;
    let signature = Signature::from_der(&hex::decode(signature)?)?;
    key.verify(string_to_sign.as_bytes(), &signature)?;
    Ok(())
}

#[test]
fn test_v4a_header() -> Result<()> {
    init_signing_test();

    let mut req = request_parts(Method::GET, "https://example.amazonaws.com/")?;
    RequestSignerV4a::new("service", ["us-east-1"])
        .with_time(suite_time())
        .sign_request(
            &mut req,
            SignableBody::Bytes(b""),
            Some(&suite_credential()),
            SigningMethod::Header,
        )?;

    let creq = [
        "GET",
        "/",
        "",
        "host:example.amazonaws.com",
        "x-amz-date:20150830T123600Z",
        "x-amz-region-set:us-east-1",
        "",
        "host;x-amz-date;x-amz-region-set",
        EMPTY_STRING_SHA256,
    ]
    .join("\n");
    let string_to_sign = format!(
        "AWS4-ECDSA-P256-SHA256\n20150830T123600Z\n20150830/service/aws4_request\n{}",
        hex_sha256(creq.as_bytes())
    );

    assert!(req.headers[AUTHORIZATION].to_str()?.starts_with(
        "AWS4-ECDSA-P256-SHA256 Credential=AKIDEXAMPLE/20150830/service/aws4_request, \
         SignedHeaders=host;x-amz-date;x-amz-region-set, Signature="
    ));
    verify(&string_to_sign, &authorization_signature(&req)?)
}

#[test]
fn test_v4a_presign() -> Result<()> {
    init_signing_test();

    let mut req = request_parts(Method::GET, "https://example.amazonaws.com/?existing=param")?;
    RequestSignerV4a::new("service", ["us-east-1", "us-west-2"])
        .with_config(SigningConfig::default().with_disable_implicit_payload_hashing(true))
        .with_time(suite_time())
        .sign_request(
            &mut req,
            SignableBody::Streaming,
            Some(&suite_credential()),
            SigningMethod::Query(Some(Duration::from_secs(300))),
        )?;

    let signature = query_param(&req, "X-Amz-Signature").expect("signature must exist");
    assert_eq!(
        query_param(&req, "X-Amz-Region-Set"),
        Some("us-east-1%2Cus-west-2")
    );

    let creq = [
        "GET",
        "/",
        "X-Amz-Algorithm=AWS4-ECDSA-P256-SHA256\
         &X-Amz-Credential=AKIDEXAMPLE%2F20150830%2Fservice%2Faws4_request\
         &X-Amz-Date=20150830T123600Z\
         &X-Amz-Expires=300\
         &X-Amz-Region-Set=us-east-1%2Cus-west-2\
         &X-Amz-SignedHeaders=host\
         &existing=param",
        "host:example.amazonaws.com",
        "",
        "host",
        "UNSIGNED-PAYLOAD",
    ]
    .join("\n");
    let string_to_sign = format!(
        "AWS4-ECDSA-P256-SHA256\n20150830T123600Z\n20150830/service/aws4_request\n{}",
        hex_sha256(creq.as_bytes())
    );
    verify(&string_to_sign, signature)
}

#[test]
fn test_v4a_signatures_are_randomized() -> Result<()> {
    init_signing_test();

    let sign = || -> Result<String> {
        let mut req = request_parts(Method::GET, "https://example.amazonaws.com/")?;
        RequestSignerV4a::new("service", ["*"])
            .with_time(suite_time())
            .sign_request(
                &mut req,
                SignableBody::Bytes(b""),
                Some(&suite_credential()),
                SigningMethod::Header,
            )?;
        authorization_signature(&req)
    };

    assert_ne!(sign()?, sign()?);
    Ok(())
}

#[test]
fn test_v4a_random_failure() -> Result<()> {
    init_signing_test();

    let mut req = request_parts(Method::GET, "https://example.amazonaws.com/")?;
    let err = RequestSignerV4a::new("service", ["us-east-1"])
        .with_random_source(Unavailable)
        .with_time(suite_time())
        .sign_request(
            &mut req,
            SignableBody::Bytes(b""),
            Some(&suite_credential()),
            SigningMethod::Header,
        )
        .expect_err("sign must fail");

    assert_eq!(err.kind(), ErrorKind::EntropyUnavailable);
    assert_eq!(err.to_string(), "getrandom: this target is not supported");
    assert!(req.headers.is_empty());
    Ok(())
}

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

use http::request::Parts;

use amzsign_core::hash::{hex_hmac_sha256, hmac_sha256};
use amzsign_core::time::{format_date, now, DateTime};
use amzsign_core::{Error, Result, SignRequest, SignableBody, SigningMethod};

use crate::config::SigningConfig;
use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST};
use crate::sign_request::{sign_parts, SigningParams};
use crate::Credential;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    config: SigningConfig,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new SigV4 signer for the service in the region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            config: SigningConfig::default(),

            time: None,
        }
    }

    /// Replace the signing config.
    pub fn with_config(mut self, config: SigningConfig) -> Self {
        self.config = config;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn check(&self) -> Result<()> {
        if self.service.is_empty() {
            return Err(Error::config_invalid("service is empty"));
        }
        if self.region.is_empty() {
            return Err(Error::config_invalid("region is empty"));
        }

        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut Parts,
        body: SignableBody<'_>,
        credential: Option<&Self::Credential>,
        method: SigningMethod,
    ) -> Result<()> {
        self.check()?;

        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        // Scope: "20220313/<region>/<service>/aws4_request"
        let params = SigningParams {
            algorithm: AWS4_HMAC_SHA256,
            scope: format!(
                "{}/{}/{}/{}",
                format_date(now),
                self.region,
                self.service,
                AWS4_REQUEST
            ),
            region_set: None,
            config: &self.config,
            time: now,
        };

        sign_parts(req, body, cred, method, &params, |string_to_sign| {
            let signing_key =
                generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
            Ok(hex_hmac_sha256(&signing_key, string_to_sign.as_bytes()))
        })
    }
}

/// Derive the SigV4 signing key for a day, region and service.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}

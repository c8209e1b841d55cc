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

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bytes::BufMut;
use crypto_bigint::{Encoding, U256};
use http::request::Parts;
use p256::ecdsa::signature::RandomizedSigner;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use amzsign_core::hash::hmac_sha256;
use amzsign_core::time::{format_date, now, DateTime};
use amzsign_core::{Error, Result, SignRequest, SignableBody, SigningMethod};

use crate::config::SigningConfig;
use crate::constants::{AWS4_ECDSA_P256_SHA256, AWS4_REQUEST};
use crate::random::{Entropy, OsRandom, RandomSource};
use crate::sign_request::{sign_parts, SigningParams};
use crate::Credential;

/// Order of the P-256 group, see section 3.2.1.3 of NIST SP 800-186.
const P256_ORDER: U256 =
    U256::from_be_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");

/// Counter values tried before the derivation gives up.
const MAX_DERIVATION_ATTEMPTS: u8 = 254;

/// RequestSignerV4a that implement AWS SigV4A, the asymmetric variant of
/// SigV4 whose signature is valid in every region of a region set.
///
/// - [Signing AWS API requests](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html)
pub struct RequestSignerV4a {
    service: String,
    region_set: Vec<String>,
    config: SigningConfig,
    random: Arc<dyn RandomSource>,

    time: Option<DateTime>,
}

impl RequestSignerV4a {
    /// Create a new SigV4A signer for the service in the region set.
    ///
    /// Regions may use wildcards, like `us-*` or `*`.
    pub fn new<I, S>(service: &str, region_set: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            service: service.into(),
            region_set: region_set
                .into_iter()
                .map(|v| v.as_ref().to_string())
                .collect(),
            config: SigningConfig::default(),
            random: Arc::new(OsRandom),

            time: None,
        }
    }

    /// Replace the signing config.
    pub fn with_config(mut self, config: SigningConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the source of the signature nonce entropy.
    ///
    /// Default to [`OsRandom`].
    pub fn with_random_source(mut self, random: impl RandomSource) -> Self {
        self.random = Arc::new(random);
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
        if self.region_set.is_empty() {
            return Err(Error::config_invalid("region set is empty"));
        }
        if self.region_set.iter().any(|v| v.is_empty()) {
            return Err(Error::config_invalid("region set contains an empty region"));
        }

        Ok(())
    }
}

impl Debug for RequestSignerV4a {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSignerV4a")
            .field("service", &self.service)
            .field("region_set", &self.region_set)
            .field("config", &self.config)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl SignRequest for RequestSignerV4a {
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
        let region_set = self.region_set.join(",");
        // Scope: "20220313/<service>/aws4_request", the region set is signed separately.
        let params = SigningParams {
            algorithm: AWS4_ECDSA_P256_SHA256,
            scope: format!("{}/{}/{}", format_date(now), self.service, AWS4_REQUEST),
            region_set: Some(&region_set),
            config: &self.config,
            time: now,
        };

        sign_parts(req, body, cred, method, &params, |string_to_sign| {
            let key = derive_signing_key(&cred.access_key_id, &cred.secret_access_key)?;
            let mut entropy = Entropy::draw(self.random.as_ref())?;

            let signature: Signature = key
                .try_sign_with_rng(&mut entropy, string_to_sign.as_bytes())
                .map_err(|e| Error::unexpected("failed to sign with ecdsa").with_source(e))?;
            Ok(hex::encode(signature.to_der().as_bytes()))
        })
    }
}

/// Derive the public key matching the SigV4A key pair of a credential.
///
/// Services use it to verify SigV4A signatures.
pub fn derive_verifying_key(access_key_id: &str, secret_access_key: &str) -> Result<VerifyingKey> {
    let key = derive_signing_key(access_key_id, secret_access_key)?;
    Ok(*key.verifying_key())
}

/// Derive the SigV4A private key with the NIST SP 800-108 counter mode KDF,
/// using HMAC-SHA256 keyed by `"AWS4A" + secret`.
pub(crate) fn derive_signing_key(access_key_id: &str, secret_access_key: &str) -> Result<SigningKey> {
    let upper = P256_ORDER.wrapping_sub(&U256::from_u8(2));
    derive_signing_key_below(access_key_id, secret_access_key, &upper)
}

/// Accept the first candidate `k0 <= upper` and use `k0 + 1` as the scalar.
fn derive_signing_key_below(
    access_key_id: &str,
    secret_access_key: &str,
    upper: &U256,
) -> Result<SigningKey> {
    let input_key = Zeroizing::new(format!("AWS4A{secret_access_key}").into_bytes());

    for counter in 1..=MAX_DERIVATION_ATTEMPTS {
        // 1 || label || 0x00 || context || L, the context being the
        // access key id followed by the counter byte.
        let mut fixed_input = Zeroizing::new(Vec::<u8>::with_capacity(
            4 + AWS4_ECDSA_P256_SHA256.len() + 1 + access_key_id.len() + 1 + 4,
        ));
        fixed_input.put_i32(1);
        fixed_input.put_slice(AWS4_ECDSA_P256_SHA256.as_bytes());
        fixed_input.put_u8(0);
        fixed_input.put_slice(access_key_id.as_bytes());
        fixed_input.put_u8(counter);
        fixed_input.put_i32(256);

        let tag = Zeroizing::new(hmac_sha256(&input_key, &fixed_input));
        let k0 = U256::from_be_slice(&tag);

        if k0 <= *upper {
            let d = Zeroizing::new(k0.wrapping_add(&U256::ONE).to_be_bytes());
            return SigningKey::from_slice(&d[..]).map_err(|e| {
                Error::unexpected("derived scalar is not a valid signing key").with_source(e)
            });
        }
    }

    Err(Error::key_derivation_exhausted(format!(
        "no valid signing key found after {MAX_DERIVATION_ATTEMPTS} attempts"
    )))
}

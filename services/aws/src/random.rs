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

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use amzsign_core::{Error, Result};

/// RandomSource provides the entropy mixed into SigV4A signature nonces.
///
/// Implementations must be cryptographically secure. Errors are returned to
/// the caller of `sign_request` unchanged and are never retried.
pub trait RandomSource: Send + Sync + 'static {
    /// Fill `dest` with random bytes.
    fn try_fill_bytes(&self, dest: &mut [u8]) -> std::result::Result<(), rand::Error>;
}

/// RandomSource backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn try_fill_bytes(&self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// Entropy drawn up front for a single signature.
///
/// ECDSA signers take an infallible rng, so the fallible draw happens
/// here and the signer only replays the bytes.
pub(crate) struct Entropy {
    bytes: Zeroizing<[u8; 32]>,
    pos: usize,
}

impl Entropy {
    pub(crate) fn draw(source: &dyn RandomSource) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        source
            .try_fill_bytes(bytes.as_mut_slice())
            .map_err(Error::entropy_unavailable)?;

        Ok(Self { bytes, pos: 0 })
    }
}

impl RngCore for Entropy {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for v in dest.iter_mut() {
            *v = self.bytes[self.pos % self.bytes.len()];
            self.pos += 1;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Entropy {}

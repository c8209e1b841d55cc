use crate::{Result, SignableBody, SigningMethod};
use http::request::Parts;
use std::fmt::Debug;

/// SigningCredential is the trait used by signers as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// SignRequest is the trait implemented by request signers.
///
/// Signing is a synchronous computation over the request: no I/O happens
/// except reading a [`SignableBody::Seekable`] body to hash it.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Sign the request in place.
    ///
    /// ## Credential
    ///
    /// Passing `None` leaves the request unsigned, which is how anonymous
    /// access is expressed.
    ///
    /// ## Method
    ///
    /// [`SigningMethod::Header`] writes the signature into headers and never
    /// touches the query string; [`SigningMethod::Query`] appends it to the
    /// query string and leaves signing headers alone.
    ///
    /// On error the request is left exactly as it was.
    fn sign_request(
        &self,
        req: &mut Parts,
        body: SignableBody<'_>,
        credential: Option<&Self::Credential>,
        method: SigningMethod,
    ) -> Result<()>;
}

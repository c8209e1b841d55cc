use std::fmt::{Debug, Formatter};
use std::io::{Read, Seek};

/// Readers that can be rewound after being read.
///
/// Implemented for every `Read + Seek` type, so `&mut File` or
/// `&mut Cursor<Vec<u8>>` can be passed as [`SignableBody::Seekable`] directly.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// SignableBody describes how a signer may observe the request body.
///
/// The body itself stays owned by the caller: signers never replace it, and a
/// seekable body is returned to the offset it was at before hashing.
pub enum SignableBody<'a> {
    /// Body held entirely in memory.
    Bytes(&'a [u8]),
    /// Body that can be read and then rewound.
    Seekable(&'a mut dyn ReadSeek),
    /// Body that can only be read once, e.g. a network stream.
    ///
    /// Signers must not consume it.
    Streaming,
    /// Hex encoded SHA256 digest of the body computed by the caller.
    Precomputed(String),
}

impl SignableBody<'_> {
    /// An empty in-memory body.
    pub fn empty() -> Self {
        SignableBody::Bytes(&[])
    }
}

impl Debug for SignableBody<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignableBody::Bytes(bs) => f.debug_tuple("Bytes").field(&bs.len()).finish(),
            SignableBody::Seekable(_) => f.write_str("Seekable"),
            SignableBody::Streaming => f.write_str("Streaming"),
            SignableBody::Precomputed(hash) => f.debug_tuple("Precomputed").field(hash).finish(),
        }
    }
}

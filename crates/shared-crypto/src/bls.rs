//! BLS12-381 Signature Implementation
//!
//! Public keys live on G1 (48 bytes compressed), signatures on G2 (96 bytes),
//! matching the `min_pk` ciphersuite warp validators sign with.
//!
//! Provides:
//! - Key generation from fresh randomness or a 32-byte seed
//! - Sign/verify over raw message bytes
//! - Order-independent aggregation of public keys and signatures

use blst::min_pk::{AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::CryptoError;

/// Domain separation tag (proof-of-possession ciphersuite).
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Secret key width in bytes.
pub const BLS_SECRET_KEY_LEN: usize = 32;

/// Compressed public key width in bytes.
pub const BLS_PUBLIC_KEY_LEN: usize = 48;

/// Compressed signature width in bytes.
pub const BLS_SIGNATURE_LEN: usize = 96;

/// BLS public key (48 bytes compressed)
#[derive(Clone, Copy, Debug)]
pub struct BlsPublicKey(PublicKey);

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

/// BLS signature (96 bytes)
#[derive(Clone, Copy, Debug)]
pub struct BlsSignature(Signature);

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

/// BLS key pair held by a signing node.
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a key pair from fresh randomness.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = Zeroizing::new([0u8; 32]);
        rand::thread_rng().fill_bytes(&mut ikm[..]);
        Self::from_seed(&ikm)
    }

    /// Derive a key pair deterministically from 32 bytes of keying material.
    pub fn from_seed(ikm: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret = SecretKey::key_gen(ikm, &[])
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("{e:?}")))?;
        Ok(Self::from_secret(secret))
    }

    /// Restore a key pair from serialized secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8; BLS_SECRET_KEY_LEN]) -> Result<Self, CryptoError> {
        let secret = SecretKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = BlsPublicKey(secret.sk_to_pk());
        Self { secret, public }
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, DST, &[]))
    }

    /// Get the public key
    pub fn public_key(&self) -> BlsPublicKey {
        self.public
    }

    /// Serialized secret key, wiped when the returned buffer is dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; BLS_SECRET_KEY_LEN]> {
        Zeroizing::new(self.secret.to_bytes())
    }
}

impl BlsPublicKey {
    /// Verify a signature against this public key
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        signature.0.verify(true, message, DST, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Parse a compressed key, rejecting the identity and points outside the
    /// prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        PublicKey::key_validate(bytes)
            .map(BlsPublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Serialize to 48-byte compressed form
    pub fn to_bytes(&self) -> [u8; BLS_PUBLIC_KEY_LEN] {
        self.0.to_bytes()
    }

    /// Aggregate public keys into the key that verifies their aggregate
    /// signature. Order does not matter.
    pub fn aggregate<'a, I>(keys: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = &'a BlsPublicKey>,
    {
        let refs: Vec<&PublicKey> = keys.into_iter().map(|k| &k.0).collect();
        if refs.is_empty() {
            return Err(CryptoError::InvalidInput("empty key list".into()));
        }
        // Keys were validated when parsed.
        AggregatePublicKey::aggregate(&refs, false)
            .map(|apk| BlsPublicKey(apk.to_public_key()))
            .map_err(|_| CryptoError::AggregationFailed)
    }
}

impl BlsSignature {
    /// Parse a compressed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != BLS_SIGNATURE_LEN {
            return Err(CryptoError::InvalidSignature);
        }
        Signature::from_bytes(bytes)
            .map(BlsSignature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Serialize to 96-byte form
    pub fn to_bytes(&self) -> [u8; BLS_SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    /// Aggregate signatures over the same message.
    pub fn aggregate<'a, I>(sigs: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = &'a BlsSignature>,
    {
        let refs: Vec<&Signature> = sigs.into_iter().map(|s| &s.0).collect();
        if refs.is_empty() {
            return Err(CryptoError::InvalidInput("empty signature list".into()));
        }
        AggregateSignature::aggregate(&refs, true)
            .map(|asig| BlsSignature(asig.to_signature()))
            .map_err(|_| CryptoError::AggregationFailed)
    }
}

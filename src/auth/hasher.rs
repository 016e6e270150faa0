//! Key stretching and salt generation.
//!
//! PBKDF2 with HMAC-SHA1, deliberately slow via the iteration count. The
//! parameters are tunable per deployment but must stay fixed for the
//! lifetime of a stored credential, so verification can reproduce the exact
//! digest from the stored salt.

use base64ct::{Base64UrlUnpadded, Encoding};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::Sha1;
use std::fmt;

pub const DEFAULT_SALT_BYTES: usize = 24;
pub const DEFAULT_HASH_BYTES: usize = 24;
pub const DEFAULT_ITERATIONS: u32 = 20_000;

/// Per-credential random salt. Serialized as a base64url string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base64UrlUnpadded::encode_string(&self.0))
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64UrlUnpadded::encode_string(&self.0))
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64UrlUnpadded::decode_vec(&encoded)
            .map(Salt)
            .map_err(serde::de::Error::custom)
    }
}

/// Source of cryptographically random salts, drawn from the operating
/// system's RNG.
#[derive(Debug, Clone, Copy)]
pub struct SaltGenerator {
    num_bytes: usize,
}

impl Default for SaltGenerator {
    fn default() -> Self {
        Self {
            num_bytes: DEFAULT_SALT_BYTES,
        }
    }
}

impl SaltGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_len(num_bytes: usize) -> Self {
        Self { num_bytes }
    }

    pub fn generate(&self) -> Salt {
        let mut bytes = vec![0u8; self.num_bytes];
        OsRng.fill_bytes(&mut bytes);
        Salt(bytes)
    }
}

fn hex_hash<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn hash_from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    hex::decode(&encoded).map_err(serde::de::Error::custom)
}

/// Stored outcome of stretching a password with a salt: the derived hash
/// (serialized as a lowercase hex string) together with the salt it was
/// derived under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltedPasswordDigest {
    #[serde(serialize_with = "hex_hash", deserialize_with = "hash_from_hex")]
    hash: Vec<u8>,
    salt: Salt,
}

impl SaltedPasswordDigest {
    pub fn new(hash: Vec<u8>, salt: Salt) -> Self {
        Self { hash, salt }
    }

    /// Raw derived-hash bytes; this is what credential verification
    /// compares in constant time.
    pub fn hash_bytes(&self) -> &[u8] {
        &self.hash
    }

    /// Lowercase hex rendering of the hash, the serialized form.
    pub fn hash_hex(&self) -> String {
        hex::encode(&self.hash)
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }
}

/// PBKDF2-HMAC-SHA1 key stretcher. Deterministic: identical password, salt
/// and parameters always yield an identical digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: u32,
    hash_bytes: usize,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            hash_bytes: DEFAULT_HASH_BYTES,
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(iterations: u32, hash_bytes: usize) -> Self {
        Self {
            iterations,
            hash_bytes,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn hash_bytes(&self) -> usize {
        self.hash_bytes
    }

    pub fn hash(&self, password: &str, salt: &Salt) -> SaltedPasswordDigest {
        let mut derived = vec![0u8; self.hash_bytes];
        pbkdf2_hmac::<Sha1>(
            password.as_bytes(),
            salt.as_bytes(),
            self.iterations,
            &mut derived,
        );
        SaltedPasswordDigest::new(derived, salt.clone())
    }
}

use blake2::digest::Digest;
use blake2::Blake2b512;
use std::fmt;
use xxhash_rust::xxh3::{xxh3_64_with_seed, Xxh3};

/// Maps a key to a raw 64-bit hash. The table reduces it modulo capacity,
/// so implementations need not know the slot count.
pub trait SlotHash {
    fn hash(&self, key: &str) -> u64;
}

impl<F> SlotHash for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash(&self, key: &str) -> u64 { self(key) }
}

/* ---------------------------- polynomial (default) ---------------------------- */

const POLY_SEED: u64 = 7;
const POLY_MULTIPLIER: u64 = 31;

/// `h = 7; for each UTF-8 byte b: h = h * 31 + b`.
///
/// Arithmetic wraps at 64 bits. Keys short enough not to overflow (about a
/// dozen ASCII bytes) land in the same slot as an arbitrary-precision run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialHash;

impl SlotHash for PolynomialHash {
    #[inline]
    fn hash(&self, key: &str) -> u64 {
        key.bytes().fold(POLY_SEED, |h, b| {
            h.wrapping_mul(POLY_MULTIPLIER).wrapping_add(b as u64)
        })
    }
}

/* ---------------------------- domain-separated stream ---------------------------- */

/// Fast non-cryptographic vs cryptographic mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashMode {
    /// xxh3-64, seeded from the domain.
    #[default]
    Fast,
    /// BLAKE2b-512, truncated to its first 8 bytes.
    Cryptographic,
}

/// Keyed hash with a domain tag mixed in once at construction, so two
/// tables built with different domains scatter the same keys differently.
#[derive(Clone)]
pub struct StreamHash {
    domain_seed: u64,
    domain_blake: Option<Blake2b512>,
    hash_mode: HashMode,
}

impl StreamHash {
    pub fn new(domain: &[u8], hash_mode: HashMode) -> Self {
        match hash_mode {
            HashMode::Fast => {
                // domain_seed = xxh3_64("HCSv1" || domain) unseeded
                let mut st = Xxh3::new();
                st.update(b"HCSv1");
                st.update(domain);

                Self { domain_seed: st.digest(), domain_blake: None, hash_mode }
            }
            HashMode::Cryptographic => {
                let mut st = Blake2b512::new();
                st.update(b"HCSv1");
                st.update((domain.len() as u64).to_be_bytes());
                st.update(domain);

                Self { domain_seed: 0, domain_blake: Some(st), hash_mode }
            }
        }
    }

    #[inline]
    pub fn hash_mode(&self) -> HashMode { self.hash_mode }

    fn crypto_hash(base: &Blake2b512, key: &[u8]) -> u64 {
        let mut st = base.clone();
        st.update((key.len() as u64).to_be_bytes());
        st.update(key);
        let digest = st.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }
}

impl SlotHash for StreamHash {
    fn hash(&self, key: &str) -> u64 {
        match &self.domain_blake {
            Some(base) => Self::crypto_hash(base, key.as_bytes()),
            None => xxh3_64_with_seed(key.as_bytes(), self.domain_seed),
        }
    }
}

impl fmt::Debug for StreamHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHash").field("hash_mode", &self.hash_mode).finish_non_exhaustive()
    }
}

/* ---------------------------- runtime choice ---------------------------- */

/// Hash picked at runtime from a [`TableConfig`](crate::TableConfig).
#[derive(Debug, Clone)]
pub enum ConfiguredHash {
    Polynomial(PolynomialHash),
    Stream(StreamHash),
}

impl SlotHash for ConfiguredHash {
    #[inline]
    fn hash(&self, key: &str) -> u64 {
        match self {
            ConfiguredHash::Polynomial(h) => h.hash(key),
            ConfiguredHash::Stream(h) => h.hash(key),
        }
    }
}

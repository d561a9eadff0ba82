use std::hash::Hasher;
use twox_hash::XxHash64;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Maps arbitrary bytes onto the 64-bit ring. Implementations must be stable
/// across runs and platforms, otherwise two processes disagree on placement.
pub trait HashFunction: Sync + Send {
    fn hash(&self, key: &[u8]) -> u64;

    fn hash_str(&self, key: &str) -> u64 {
        self.hash(key.as_bytes())
    }
}

/// 64-bit FNV-1a. Default ring hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1a;

impl HashFunction for Fnv1a {
    fn hash(&self, key: &[u8]) -> u64 {
        key.iter().fold(FNV_OFFSET_BASIS, |acc, &byte| {
            (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XxHash;

impl HashFunction for XxHash {
    fn hash(&self, key: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(key);
        hasher.finish()
    }
}

/// Selects one of the built-in hash functions from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Fnv1a,
    XxHash64,
}

impl HashAlgorithm {
    pub fn build(self) -> Box<dyn HashFunction> {
        match self {
            HashAlgorithm::Fnv1a => Box::new(Fnv1a),
            HashAlgorithm::XxHash64 => Box::new(XxHash),
        }
    }
}

use crate::hash_function::{ConfiguredHash, HashMode, PolynomialHash, StreamHash};

/// Slot count used by [`HashTable::new`](crate::HashTable::new).
pub const DEFAULT_CAPACITY: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashChoice {
    #[default]
    Polynomial,
    Stream(HashMode),
}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub capacity: usize,     // Number of slots, fixed for the table's lifetime
    pub hash: HashChoice,    // Slot hash function
    pub domain: Vec<u8>,     // Domain separation tag (stream hash only)
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hash: HashChoice::Polynomial,
            domain: b"chained_table".to_vec(),
        }
    }
}

impl TableConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, ..Self::default() }
    }

    pub(crate) fn build_hash(&self) -> ConfiguredHash {
        match self.hash {
            HashChoice::Polynomial => ConfiguredHash::Polynomial(PolynomialHash),
            HashChoice::Stream(mode) => ConfiguredHash::Stream(StreamHash::new(&self.domain, mode)),
        }
    }
}

/* -------- Public modules -------- */
pub mod chain;
pub mod config;
pub mod hash_function;
pub mod logger;
pub mod table;

/* -------- Re-exports -------- */
pub use chain::Chain;
pub use config::{HashChoice, TableConfig, DEFAULT_CAPACITY};
pub use hash_function::{ConfiguredHash, HashMode, PolynomialHash, SlotHash, StreamHash};
pub use table::{HashTable, PutOutcome};

/* -------- Error type -------- */
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
    #[error("slot distribution is undefined: every slot is empty")]
    NoOccupiedSlots,
}

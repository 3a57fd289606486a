use log::{debug, trace};
use std::fmt;

use crate::chain::Chain;
use crate::config::{TableConfig, DEFAULT_CAPACITY};
use crate::hash_function::{ConfiguredHash, PolynomialHash, SlotHash};
use crate::TableError;

/// Result of [`HashTable::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PutOutcome<V> {
    /// The key was absent and has been added.
    Inserted,
    /// The key was present; holds the value that was replaced.
    Updated(V),
    /// The key was present and overwrite was off; hands back the value
    /// that was not stored.
    Rejected(V),
}

impl<V> PutOutcome<V> {
    pub fn is_inserted(&self) -> bool { matches!(self, PutOutcome::Inserted) }

    pub fn is_updated(&self) -> bool { matches!(self, PutOutcome::Updated(_)) }

    pub fn is_rejected(&self) -> bool { matches!(self, PutOutcome::Rejected(_)) }

    /// The replaced value, if any.
    pub fn into_previous(self) -> Option<V> {
        match self {
            PutOutcome::Updated(old) => Some(old),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PutOutcome::Inserted => "inserted",
            PutOutcome::Updated(_) => "updated",
            PutOutcome::Rejected(_) => "rejected",
        }
    }
}

/// Fixed-capacity hash table with separate chaining.
///
/// Each key is routed to slot `hash(key) % capacity`, and every per-key
/// operation is delegated to the [`Chain`] in that slot. The slot count never
/// changes, so the load factor is unbounded and chains grow with it.
pub struct HashTable<V, H = PolynomialHash> {
    slots: Vec<Chain<V>>,
    hasher: H,
}

impl<V> HashTable<V, PolynomialHash> {
    /// Twelve slots, polynomial hash.
    pub fn new() -> Self {
        Self::build(DEFAULT_CAPACITY, PolynomialHash)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, PolynomialHash)
    }
}

impl<V> Default for HashTable<V, PolynomialHash> {
    fn default() -> Self { Self::new() }
}

impl<V> HashTable<V, ConfiguredHash> {
    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        Self::with_hasher(config.capacity, config.build_hash())
    }
}

impl<V, H> HashTable<V, H> {
    fn build(capacity: usize, hasher: H) -> Self {
        debug!("creating hash table with {} slots", capacity);
        let slots = std::iter::repeat_with(Chain::new).take(capacity).collect();
        Self { slots, hasher }
    }
}

impl<V, H: SlotHash> HashTable<V, H> {
    // ---------------- constructors ----------------

    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity(capacity));
        }
        Ok(Self::build(capacity, hasher))
    }

    // ---------------- routing ----------------

    /// Slot that `key` is routed to.
    #[inline]
    pub fn slot_index(&self, key: &str) -> usize {
        (self.hasher.hash(key) % self.slots.len() as u64) as usize
    }

    #[inline]
    fn slot(&self, key: &str) -> &Chain<V> {
        &self.slots[self.slot_index(key)]
    }

    // ---------------- per-key ops ----------------

    pub fn contains(&self, key: &str) -> bool {
        self.slot(key).contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.slot(key).get(key)
    }

    /// Returns the stored value, or `default` when the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.slot(key).get_or(key, default)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let sidx = self.slot_index(key);
        self.slots[sidx].get_mut(key)
    }

    /// Inserts `key`, or replaces its value when `overwrite` is set.
    ///
    /// A rejected put leaves the table untouched and returns the value.
    pub fn put(&mut self, key: &str, value: V, overwrite: bool) -> PutOutcome<V> {
        let sidx = self.slot_index(key);
        let chain = &mut self.slots[sidx];

        let outcome = match chain.get_mut(key) {
            Some(current) if overwrite => PutOutcome::Updated(std::mem::replace(current, value)),
            Some(_) => PutOutcome::Rejected(value),
            None => {
                chain.insert(key.to_owned(), value);
                PutOutcome::Inserted
            }
        };

        trace!("put {:?} -> slot {}: {}", key, sidx, outcome.label());
        outcome
    }

    /// Removes `key` and returns its value; `None` leaves the table as it was.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let sidx = self.slot_index(key);
        let removed = self.slots[sidx].remove(key);
        trace!("remove {:?} from slot {}: {}", key, sidx, if removed.is_some() { "hit" } else { "miss" });
        removed
    }

    /// Copies every entry of `other` into `self` through [`put`](Self::put).
    ///
    /// With `overwrite` off, values already in `self` win on collision.
    pub fn merge<H2: SlotHash>(&mut self, other: &HashTable<V, H2>, overwrite: bool)
    where
        V: Clone,
    {
        let (mut inserted, mut updated, mut rejected) = (0usize, 0usize, 0usize);
        for (key, value) in other.iter() {
            match self.put(key, value.clone(), overwrite) {
                PutOutcome::Inserted => inserted += 1,
                PutOutcome::Updated(_) => updated += 1,
                PutOutcome::Rejected(_) => rejected += 1,
            }
        }
        debug!(
            "merged {} entries: {} inserted, {} updated, {} kept",
            inserted + updated + rejected, inserted, updated, rejected
        );
    }
}

impl<V, H> HashTable<V, H> {
    // ---------------- whole-table views ----------------

    /// Entry count, summed over every chain on each call.
    pub fn len(&self) -> usize {
        self.slots.iter().map(Chain::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Chain::is_empty)
    }

    #[inline]
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// Entries in slot order, then chain order within a slot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().flat_map(|chain| chain.iter())
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.iter().flat_map(|chain| chain.keys()).collect()
    }

    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.slots.iter().flat_map(|chain| chain.values()).collect()
    }

    pub fn entries(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.slots.iter().flat_map(|chain| chain.entries()).collect()
    }

    pub fn clear(&mut self) {
        debug!("clearing {} slots", self.slots.len());
        self.slots.iter_mut().for_each(Chain::clear);
    }

    // ---------------- load metrics ----------------

    /// `len / capacity`; exceeds 1.0 once chains average more than one entry.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.slots.len() as f64
    }

    /// Mean chain length over non-empty slots only.
    pub fn average_slot_distribution(&self) -> Result<f64, TableError> {
        let (total, occupied) = self
            .slots
            .iter()
            .filter(|chain| !chain.is_empty())
            .fold((0usize, 0usize), |(total, occupied), chain| (total + chain.len(), occupied + 1));

        if occupied == 0 {
            return Err(TableError::NoOccupiedSlots);
        }
        Ok(total as f64 / occupied as f64)
    }

    /// Chain length of every slot, in slot order.
    pub fn slot_sizes(&self) -> Vec<usize> {
        self.slots.iter().map(Chain::len).collect()
    }
}

impl<V: Clone, H: Clone> Clone for HashTable<V, H> {
    /// Deep copy: same capacity and hash, freshly built chains.
    fn clone(&self) -> Self {
        Self { slots: self.slots.clone(), hasher: self.hasher.clone() }
    }
}

impl<V: fmt::Debug, H> fmt::Debug for HashTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.slots.len())
            .field("slots", &self.slots)
            .finish()
    }
}

impl<V, H: SlotHash> Extend<(String, V)> for HashTable<V, H> {
    fn extend<I: IntoIterator<Item = (String, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.put(&key, value, true);
        }
    }
}

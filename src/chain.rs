//! Doubly-linked sequence of key/value nodes used as one slot of a
//! [`HashTable`](crate::HashTable).
//!
//! Nodes are stored in a `Vec` arena and linked by index rather than by
//! pointer. `NIL` marks a missing link. Vacated arena cells are recycled
//! through a free list, and the whole arena is reset once the chain empties.

use std::fmt;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node<V> {
    key: String,
    value: V,
    prev: usize,
    next: usize,
}

impl<V> Node<V> {
    #[inline]
    fn has_prev(&self) -> bool { self.prev != NIL }

    #[inline]
    fn has_next(&self) -> bool { self.next != NIL }
}

/// A chain owns its nodes; callers only ever see keys and values.
///
/// Lookups scan head→tail and stop at the first match, so if `insert` is
/// called twice with the same key the older node shadows the newer one.
pub struct Chain<V> {
    nodes: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl<V> Default for Chain<V> {
    fn default() -> Self { Self::new() }
}

impl<V> Chain<V> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), free: Vec::new(), head: NIL, tail: NIL }
    }

    // ---------------- arena helpers ----------------

    #[inline]
    fn node(&self, idx: usize) -> &Node<V> {
        self.nodes[idx].as_ref().expect("chain link points at a vacant arena cell")
    }

    #[inline]
    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        self.nodes[idx].as_mut().expect("chain link points at a vacant arena cell")
    }

    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        let mut cursor = self.head;
        while cursor != NIL {
            let node = self.node(cursor);
            if node.key == key {
                return Some(cursor);
            }
            cursor = node.next;
        }
        None
    }

    // ---------------- per-key ops ----------------

    /// Appends a node at the tail. No uniqueness check is made here.
    pub fn insert(&mut self, key: String, value: V) {
        let prev = self.tail;
        let idx = self.alloc(Node { key, value, prev, next: NIL });

        if self.head == NIL {
            self.head = idx;
        } else {
            self.node_mut(prev).next = idx;
        }
        self.tail = idx;
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|idx| &self.node(idx).value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.node_mut(idx).value)
    }

    /// Returns the stored value, or `default` when the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Replaces the value in place and returns the old one.
    pub fn update(&mut self, key: &str, value: V) -> Option<V> {
        let idx = self.find(key)?;
        Some(std::mem::replace(&mut self.node_mut(idx).value, value))
    }

    /// Unlinks the first node holding `key` and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.find(key)?;
        let (prev, next, has_prev, has_next) = {
            let node = self.node(idx);
            (node.prev, node.next, node.has_prev(), node.has_next())
        };

        match (has_prev, has_next) {
            (true, true) => {
                self.node_mut(prev).next = next;
                self.node_mut(next).prev = prev;
            }
            (true, false) => {
                self.tail = prev;
                self.node_mut(prev).next = NIL;
            }
            (false, true) => {
                self.head = next;
                self.node_mut(next).prev = NIL;
            }
            (false, false) => {
                self.head = NIL;
                self.tail = NIL;
            }
        }

        let node = self.nodes[idx].take().expect("found node vanished from arena");
        if self.head == NIL {
            self.nodes.clear();
            self.free.clear();
        } else {
            self.free.push(idx);
        }
        Some(node.value)
    }

    // ---------------- whole-chain ops ----------------

    /// Number of nodes, counted by walking the links.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Entries head→tail; `.rev()` walks tail→head over the `prev` links.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { chain: self, front: self.head, back: self.tail }
    }

    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect()
    }

    /// Walks the links in both directions and checks head/tail agreement.
    #[cfg(test)]
    pub(crate) fn check_links(&self) {
        assert_eq!(self.head == NIL, self.tail == NIL, "head/tail emptiness disagree");

        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        let forward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cursor = self.head;
            while cursor != NIL {
                assert!(out.len() < live, "forward walk exceeds live node count");
                out.push(cursor);
                cursor = self.node(cursor).next;
            }
            out
        };
        let mut backward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cursor = self.tail;
            while cursor != NIL {
                assert!(out.len() < live, "backward walk exceeds live node count");
                out.push(cursor);
                cursor = self.node(cursor).prev;
            }
            out
        };
        backward.reverse();

        assert_eq!(forward.len(), live);
        assert_eq!(forward, backward);
        assert_eq!(forward.last().copied().unwrap_or(NIL), self.tail);
    }
}

impl<V: Clone> Clone for Chain<V> {
    /// Rebuilds the sequence node by node; the copy shares nothing with `self`.
    fn clone(&self) -> Self {
        let mut copy = Chain::new();
        for (key, value) in self.iter() {
            copy.insert(key.to_owned(), value.clone());
        }
        copy
    }
}

impl<V: fmt::Debug> fmt::Debug for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, V> {
    chain: &'a Chain<V>,
    front: usize,
    back: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == NIL {
            return None;
        }
        let node = self.chain.node(self.front);
        if self.front == self.back {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.front = node.next;
        }
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back == NIL {
            return None;
        }
        let node = self.chain.node(self.back);
        if self.front == self.back {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.back = node.prev;
        }
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(keys: &[&str]) -> Chain<usize> {
        let mut chain = Chain::new();
        for (i, key) in keys.iter().enumerate() {
            chain.insert(key.to_string(), i);
        }
        chain
    }

    #[test]
    fn test_insert_keeps_order() {
        let chain = chain_of(&["a", "b", "c"]);
        chain.check_links();
        assert_eq!(chain.keys(), vec!["a", "b", "c"]);
        assert_eq!(chain.values(), vec![0, 1, 2]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_empty_chain() {
        let chain: Chain<i32> = Chain::new();
        chain.check_links();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.get("missing"), None);
        assert_eq!(chain.get_or("missing", &-1), &-1);
        assert!(chain.entries().is_empty());
    }

    #[test]
    fn test_duplicate_insert_shadows_newer() {
        let mut chain = Chain::new();
        chain.insert("k".to_string(), "first");
        chain.insert("k".to_string(), "second");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get("k"), Some(&"first"));

        assert_eq!(chain.remove("k"), Some("first"));
        assert_eq!(chain.get("k"), Some(&"second"));
        chain.check_links();
    }

    #[test]
    fn test_update_in_place() {
        let mut chain = chain_of(&["a", "b"]);
        assert_eq!(chain.update("b", 10), Some(1));
        assert_eq!(chain.get("b"), Some(&10));
        assert_eq!(chain.update("zz", 5), None);
        assert_eq!(chain.keys(), vec!["a", "b"]);

        *chain.get_mut("a").unwrap() += 7;
        assert_eq!(chain.get("a"), Some(&7));
    }

    #[test]
    fn test_remove_middle() {
        let mut chain = chain_of(&["a", "b", "c"]);
        assert_eq!(chain.remove("b"), Some(1));
        chain.check_links();
        assert_eq!(chain.keys(), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_tail() {
        let mut chain = chain_of(&["a", "b", "c"]);
        assert_eq!(chain.remove("c"), Some(2));
        chain.check_links();
        assert_eq!(chain.keys(), vec!["a", "b"]);
        chain.insert("d".to_string(), 3);
        assert_eq!(chain.keys(), vec!["a", "b", "d"]);
        chain.check_links();
    }

    #[test]
    fn test_remove_head() {
        let mut chain = chain_of(&["a", "b", "c"]);
        assert_eq!(chain.remove("a"), Some(0));
        chain.check_links();
        assert_eq!(chain.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_remove_sole_node() {
        let mut chain = chain_of(&["only"]);
        assert_eq!(chain.remove("only"), Some(0));
        chain.check_links();
        assert!(chain.is_empty());
        assert_eq!(chain.iter().next(), None);

        chain.insert("again".to_string(), 9);
        chain.check_links();
        assert_eq!(chain.entries(), vec![("again".to_string(), 9)]);
    }

    #[test]
    fn test_remove_missing_leaves_chain() {
        let mut chain = chain_of(&["a", "b"]);
        assert_eq!(chain.remove("nope"), None);
        chain.check_links();
        assert_eq!(chain.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_freed_cells_are_reused() {
        let mut chain = chain_of(&["a", "b", "c", "d"]);
        chain.remove("b");
        chain.remove("c");
        chain.insert("e".to_string(), 4);
        chain.insert("f".to_string(), 5);
        chain.check_links();
        assert_eq!(chain.nodes.len(), 4);
        assert_eq!(chain.keys(), vec!["a", "d", "e", "f"]);
    }

    #[test]
    fn test_reverse_iteration() {
        let chain = chain_of(&["a", "b", "c"]);
        let back: Vec<&str> = chain.iter().rev().map(|(k, _)| k).collect();
        assert_eq!(back, vec!["c", "b", "a"]);

        let mut it = chain.iter();
        assert_eq!(it.next().map(|(k, _)| k), Some("a"));
        assert_eq!(it.next_back().map(|(k, _)| k), Some("c"));
        assert_eq!(it.next().map(|(k, _)| k), Some("b"));
        assert_eq!(it.next_back(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_clear() {
        let mut chain = chain_of(&["a", "b", "c"]);
        chain.clear();
        chain.check_links();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut chain = chain_of(&["a", "b", "c"]);
        chain.remove("a");
        let mut copy = chain.clone();
        copy.check_links();
        assert_eq!(copy.entries(), chain.entries());

        copy.update("b", 100);
        copy.insert("z".to_string(), 50);
        chain.remove("c");

        assert_eq!(chain.entries(), vec![("b".to_string(), 1)]);
        assert_eq!(copy.entries(), vec![("b".to_string(), 100), ("c".to_string(), 2), ("z".to_string(), 50)]);
    }

    #[test]
    fn test_empty_like_value_is_present() {
        let mut chain: Chain<Option<u8>> = Chain::new();
        chain.insert("none".to_string(), None);
        assert!(chain.contains("none"));
        assert_eq!(chain.get("none"), Some(&None));
        assert_eq!(chain.remove("none"), Some(None));
        assert_eq!(chain.remove("none"), None);
    }
}

use std::collections::HashMap;
use std::hash::Hash;

/// Keyed collection that remembers insertion order.
///
/// Rows are append-only, which keeps the index stable and lets every
/// ordering fall back to "first inserted wins" on ties.
#[derive(Debug)]
pub struct Table<K, V> {
    rows: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K, V> Table<K, V>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a row under a fresh key. Returns false (and stores nothing)
    /// if the key is already present.
    pub fn insert(&mut self, key: K, row: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.rows.len());
        self.rows.push(row);
        true
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).and_then(|&i| self.rows.get(i))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        self.rows.get_mut(i)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<K, V> Default for Table<K, V>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

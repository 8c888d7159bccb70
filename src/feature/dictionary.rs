//! Label dictionaries. They map labels discovered during an extraction (original labels, walks, relabeled neighbourhoods)
//! to compact ids, ids being given sequentially in order of discovery.
//!
//! A [LabelDictionary] is created empty by an extraction, grows while graphs are processed and is then frozen
//! in a [FrozenDictionary] which only answers lookups, in both directions.
//! Ids are only comparable inside one extraction so dictionaries are never shared between extractions.

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexSet;


/// The id of a key is its rank in the IndexSet, so the inverse mapping is free.
#[derive(Debug)]
pub struct LabelDictionary<K>
where
    K: Eq + Hash,
{
    ids: IndexSet<K, ahash::RandomState>,
} // end of LabelDictionary


impl<K> LabelDictionary<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        LabelDictionary {
            ids: IndexSet::default(),
        }
    }

    /// returns id of key, allocating the next id if key is new
    pub fn get_or_insert(&mut self, key: K) -> usize {
        self.ids.insert_full(key).0
    }

    /// same as get_or_insert but key is cloned only if it is new
    pub fn get_or_insert_ref<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
    {
        match self.ids.get_index_of(key) {
            Some(id) => id,
            None => self.ids.insert_full(key.to_owned()).0,
        }
    } // end of get_or_insert_ref

    pub fn get_id<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get_index_of(key)
    }

    /// number of ids allocated
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// last id allocated, None if dictionary is empty
    pub fn get_last_index(&self) -> Option<usize> {
        self.ids.len().checked_sub(1)
    }

    /// ends growth
    pub fn freeze(self) -> FrozenDictionary<K> {
        log::debug!("freezing dictionary of size {}", self.ids.len());
        FrozenDictionary { ids: self.ids }
    }
} // end of impl LabelDictionary

impl<K> Default for LabelDictionary<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        LabelDictionary::new()
    }
}


//=================================================================================

/// A dictionary that does not grow anymore. Used to retrieve the key of a feature index.
#[derive(Debug)]
pub struct FrozenDictionary<K>
where
    K: Eq + Hash,
{
    ids: IndexSet<K, ahash::RandomState>,
}

impl<K> FrozenDictionary<K>
where
    K: Eq + Hash,
{
    pub fn get_id<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get_index_of(key)
    }

    /// inverse lookup
    pub fn get_key(&self, id: usize) -> Option<&K> {
        self.ids.get_index(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
} // end of impl FrozenDictionary


// end of mod tests

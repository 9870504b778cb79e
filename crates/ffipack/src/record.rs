//! # Mappings
//!
//! Both mapping shapes share one wire format: `[Count: u32][Key][Value]*`.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::reader::Reader;
use crate::serialize::LEN_PREFIX;
use crate::serialize::Serializable;
use crate::writer::Writer;

/// An ordered list of key/value pairs.
///
/// Insertion order is preserved on the wire and keys are not deduplicated;
/// keeping them unique is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Record<K, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a pair, even if `key` is already present.
    pub fn push(&mut self, key: K, value: V) {
        self.entries.push((key, value));
    }

    /// Returns the value of the first pair whose key matches.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[(K, V)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K, V> Default for Record<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<Vec<(K, V)>> for Record<K, V> {
    fn from(entries: Vec<(K, V)>) -> Self {
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for Record<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for Record<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Record<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn pairs_size<'a, K, V>(mut pairs: impl Iterator<Item = (&'a K, &'a V)>) -> Option<usize>
where
    K: Serializable + 'a,
    V: Serializable + 'a,
{
    pairs.try_fold(LEN_PREFIX, |acc, (k, v)| {
        acc.checked_add(k.size()?)?.checked_add(v.size()?)
    })
}

impl<K: Serializable, V: Serializable> Serializable for Record<K, V> {
    fn size(&self) -> Option<usize> {
        pairs_size(self.entries.iter().map(|(k, v)| (k, v)))
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u32() as usize;
        let mut record = Record::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let key = K::read_from(reader)?;
            let value = V::read_from(reader)?;
            record.push(key, value);
        }
        Ok(record)
    }

    fn write_into(&self, writer: &mut Writer) {
        writer.write_len(self.entries.len());
        for (k, v) in &self.entries {
            k.write_into(writer);
            v.write_into(writer);
        }
    }
}

/// Pairs go out in key order. On decode a repeated key keeps its last value.
impl<K: Serializable + Ord, V: Serializable> Serializable for BTreeMap<K, V> {
    fn size(&self) -> Option<usize> {
        pairs_size(self.iter())
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u32() as usize;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::read_from(reader)?;
            let value = V::read_from(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn write_into(&self, writer: &mut Writer) {
        writer.write_len(self.len());
        for (k, v) in self {
            k.write_into(writer);
            v.write_into(writer);
        }
    }
}

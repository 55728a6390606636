use dashmap::DashMap;
use log::debug;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// A concurrent memo of raw text to its normalized form.
///
/// Entries are only written for short inputs (see [`Self::with_max_input_len`]) and live until
/// [`Self::clear`] is called. Concurrent misses on the same input may both compute and insert, which
/// is harmless because normalization is deterministic.
pub struct NormalizationCache {
    entries: DashMap<String, String, BuildHasherDefault<FxHasher>>,
    max_input_len: usize,
}

impl NormalizationCache {
    /// Inputs longer than this many bytes are not cached by default.
    pub const DEFAULT_MAX_INPUT_LEN: usize = 64;

    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(Default::default()),
            max_input_len: Self::DEFAULT_MAX_INPUT_LEN,
        }
    }

    /// Sets the length, in bytes, above which inputs are normalized without being remembered.
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    pub fn max_input_len(&self) -> usize {
        self.max_input_len
    }

    /// Returns the cached value for `input`, or computes it with `f` (caching it if short enough).
    pub fn get_or_insert_with(&self, input: &str, f: impl FnOnce(&str) -> String) -> String {
        if let Some(hit) = self.entries.get(input) {
            return hit.value().clone();
        }
        let value = f(input);
        if input.len() <= self.max_input_len {
            self.entries.insert(input.to_owned(), value.clone());
        }
        value
    }

    pub fn get(&self, input: &str) -> Option<String> {
        self.entries.get(input).map(|hit| hit.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        debug!("clearing {} cached normalizations", self.entries.len());
        self.entries.clear();
    }
}

impl Default for NormalizationCache {
    fn default() -> Self {
        Self::new()
    }
}

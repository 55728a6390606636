use crate::Map;
use std::mem;

/// Outgoing transitions of one automaton state.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum CharMap<V> {
    // All keys are common.
    Common([Option<V>; 26]),
    // Some keys are rare.
    Rare(Map<char, V>),
}

impl<V: Copy> CharMap<V> {
    pub fn new() -> Self {
        Self::Common([None; 26])
    }

    fn to_common_idx(key: char) -> Option<usize> {
        key.is_ascii_lowercase()
            .then(|| key as usize - 'a' as usize)
    }

    fn from_common_idx(idx: usize) -> char {
        (idx as u8 + b'a') as char
    }

    pub fn insert(&mut self, key: char, value: V) {
        let common_idx = Self::to_common_idx(key);

        if common_idx.is_none() {
            if let Self::Common(arr) = self {
                let map = mem::take(arr)
                    .into_iter()
                    .enumerate()
                    .filter_map(|(idx, value)| {
                        value.map(|value| (Self::from_common_idx(idx), value))
                    })
                    .collect();
                *self = Self::Rare(map);
            }
        }

        match (self, common_idx) {
            (Self::Common(arr), Some(idx)) => arr[idx] = Some(value),
            (Self::Rare(map), _) => {
                map.insert(key, value);
            }
            (Self::Common(_), None) => unreachable!("spilled above"),
        }
    }

    pub fn get(&self, key: char) -> Option<V> {
        match self {
            Self::Common(arr) => Self::to_common_idx(key).and_then(|idx| arr[idx]),
            Self::Rare(map) => map.get(&key).copied(),
        }
    }

    /// Visits every (key, value) pair. Order is unspecified.
    pub fn for_each(&self, mut f: impl FnMut(char, V)) {
        match self {
            Self::Common(arr) => {
                for (idx, value) in arr.iter().enumerate() {
                    if let Some(value) = value {
                        f(Self::from_common_idx(idx), *value);
                    }
                }
            }
            Self::Rare(map) => {
                for (&key, &value) in map {
                    f(key, value);
                }
            }
        }
    }
}

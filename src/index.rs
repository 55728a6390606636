use crate::automaton::Automaton;
use crate::error::LoadError;
use crate::mtch::{MatchHit, Matcher, PatternId};
use crate::normalize::normalize;
use crate::Map;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FromIterator;
use std::path::Path;

/// An immutable set of forbidden words, searchable all at once.
///
/// Words are normalized on the way in (see [`crate::normalize()`]), so `"Burro"`, `"burrrro"` and
/// `"8urr0"` are one and the same pattern. Lookups take `&self` and need no locking, so one index
/// can serve any number of threads.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternIndex {
    /// Distinct normalized words, in the order first seen. Position is `PatternId`.
    words: Vec<String>,
    /// Exact membership of normalized words.
    forbidden: Map<String, PatternId>,
    automaton: Automaton,
}

impl PatternIndex {
    /// Builds an index from raw words. Words that normalize to nothing are skipped.
    pub fn from_words<I, S>(raw_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();
        let mut forbidden = Map::default();
        let mut raw_count = 0usize;

        for raw in raw_words {
            raw_count += 1;
            let word = normalize(raw.as_ref());
            if word.is_empty() || forbidden.contains_key(&word) {
                continue;
            }
            forbidden.insert(word.clone(), words.len());
            words.push(word);
        }

        let automaton = Automaton::new(words.iter().map(String::as_str));

        debug!(
            "built pattern index: {} lines, {} distinct words, {} states",
            raw_count,
            words.len(),
            automaton.state_count()
        );

        Self {
            words,
            forbidden,
            automaton,
        }
    }

    /// Builds an index from a newline-delimited word list.
    ///
    /// Lines are decoded lossily, so bytes that are not UTF-8 never fail the load. They become
    /// U+FFFD, which normalization drops. Only I/O errors are reported.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, LoadError> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines.push(String::from_utf8_lossy(&buf).into_owned());
        }
        Ok(Self::from_words(lines))
    }

    /// Builds an index from a newline-delimited word list file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        debug!("loading word list from {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    /// Number of distinct normalized words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `true` if `word`, which must already be normalized, is one of the forbidden words.
    pub fn contains(&self, word: &str) -> bool {
        self.forbidden.contains_key(word)
    }

    /// Distinct normalized words, in the order they were first seen.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    /// Number of automaton states, including the root.
    pub fn state_count(&self) -> usize {
        self.automaton.state_count()
    }
}

impl Matcher for PatternIndex {
    fn find_all(&self, canonical: &str) -> Vec<MatchHit> {
        let mut hits = Vec::new();
        self.automaton
            .for_each_match(canonical, |pattern, start, end| {
                hits.push(MatchHit {
                    pattern,
                    start,
                    end,
                })
            });
        hits
    }

    fn pattern(&self, id: PatternId) -> &str {
        &self.words[id]
    }
}

impl<'a> FromIterator<&'a str> for PatternIndex {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self::from_words(iter)
    }
}

/// Identifies one distinct pattern within a [`Matcher`].
pub type PatternId = usize;

/// An occurrence of a pattern in canonical text.
///
/// `start` and `end` are character (not byte) offsets into the canonical text, with `end`
/// exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatchHit {
    pub pattern: PatternId,
    pub start: usize,
    pub end: usize,
}

/// A strategy for finding forbidden patterns in canonical text (see [`crate::normalize()`]).
///
/// [`crate::PatternIndex`] is the standard implementation. Implementations must be usable from
/// many threads at once.
pub trait Matcher: Send + Sync {
    /// Returns every occurrence of every pattern, including overlapping ones.
    fn find_all(&self, canonical: &str) -> Vec<MatchHit>;

    /// The canonical text of a pattern previously reported by [`Self::find_all`].
    fn pattern(&self, id: PatternId) -> &str;

    /// Returns `true` if any pattern occurs in `canonical`.
    fn is_match(&self, canonical: &str) -> bool {
        !self.find_all(canonical).is_empty()
    }
}

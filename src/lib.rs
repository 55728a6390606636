//! wordmask finds forbidden words in user text, even when disguised with accents, leet-speak,
//! mixed case or repeated letters, and masks them without touching anything else.
//!
//! Text flows one way: [`normalize`] produces a canonical form, a [`PatternIndex`] (an
//! Aho-Corasick automaton) finds every forbidden word in it in a single scan, and a [`Censor`]
//! maps the detections back onto the original text.

pub use crate::cache::NormalizationCache;
pub use crate::censor::{Censor, MaskPolicy};
pub use crate::error::LoadError;
pub use crate::index::PatternIndex;
pub use crate::mtch::{MatchHit, Matcher, PatternId};
pub use crate::normalize::{canonicalize, normalize, Canonical, Normalizer};

mod automaton;
mod cache;
mod censor;
mod char_map;
mod error;
mod index;
mod mtch;
mod normalize;

pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
pub(crate) type Set<V> = rustc_hash::FxHashSet<V>;

/// Returns true iff the character separates tokens for the purpose of masking. Only space, tab,
/// line feed and carriage return do; other Unicode whitespace is ordinary token content.
pub fn is_token_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}


use doc_comment::doctest;
doctest!("../README.md");

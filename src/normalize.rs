use crate::cache::NormalizationCache;
use crate::Map;
use finl_unicode::categories::{CharacterCategories, MinorCategory};
use lazy_static::lazy_static;
use std::sync::Arc;
use unicode_normalization::char::decompose_canonical;

lazy_static! {
    /// Leet-speak substitutions, applied after diacritics are removed.
    static ref LEET: Map<char, char> = include_str!("leet.csv")
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let comma = line.find(',').unwrap();
            (
                line[..comma].chars().next().unwrap(),
                line[comma + 1..].chars().next().unwrap(),
            )
        })
        .collect();
}

/// One character of canonical text, along with the span of original characters it stands for.
///
/// `first` and `last` are character (not byte) indices into the original text. They differ when a
/// run of repeated characters was collapsed, or when a multi-character decomposition produced a
/// single kept letter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Canonical {
    pub c: char,
    pub first: usize,
    pub last: usize,
}

/// Converts text to the form patterns are matched against.
///
/// In order: canonical decomposition, removal of non-spacing marks (accents), leet-speak
/// substitution, removal of anything that isn't a letter or digit, lowercasing, and finally
/// collapsing every run of identical characters to one.
///
/// ```
/// use wordmask::normalize;
///
/// assert_eq!(normalize("Burrrr0 Idi0ta!"), "buroidiotai");
/// assert_eq!(normalize("Ação"), "acao");
/// ```
pub fn normalize(input: &str) -> String {
    let mut ret = String::with_capacity(input.len());
    for_each_canonical(input, |_, c, repeat| {
        if !repeat {
            ret.push(c);
        }
    });
    ret
}

/// Like [`normalize`], but keeps track of which original characters produced each canonical
/// character, so that matches can be mapped back onto the original text.
///
/// Collecting the `c` fields yields exactly `normalize(input)`.
pub fn canonicalize(input: &str) -> Vec<Canonical> {
    let mut ret: Vec<Canonical> = Vec::with_capacity(input.len());
    for_each_canonical(input, |i, c, repeat| {
        if repeat {
            if let Some(last) = ret.last_mut() {
                last.last = i;
            }
        } else {
            ret.push(Canonical {
                c,
                first: i,
                last: i,
            });
        }
    });
    ret
}

/// Invokes `f` with (original char index, canonical char, whether it repeats the previous canonical
/// char) for every character that survives normalization.
fn for_each_canonical(input: &str, mut f: impl FnMut(usize, char, bool)) {
    let mut last = None;
    for (i, raw) in input.chars().enumerate() {
        decompose_canonical(raw, |c| {
            if is_mark_nonspacing(c) {
                return;
            }
            let c = LEET.get(&c).copied().unwrap_or(c);
            if !is_letter_or_digit(c) {
                return;
            }
            for lower in c.to_lowercase() {
                // Lowercasing may yield a decomposable character, which would not survive a second
                // pass unchanged.
                decompose_canonical(lower, |lower| {
                    if is_letter_or_digit(lower) {
                        let repeat = last == Some(lower);
                        last = Some(lower);
                        f(i, lower, repeat);
                    }
                });
            }
        });
    }
}

fn is_mark_nonspacing(c: char) -> bool {
    matches!(c.get_minor_category(), MinorCategory::Mn)
}

fn is_letter_or_digit(c: char) -> bool {
    matches!(
        c.get_minor_category(),
        MinorCategory::Lu
            | MinorCategory::Ll
            | MinorCategory::Lt
            | MinorCategory::Lm
            | MinorCategory::Lo
            | MinorCategory::Nd
            | MinorCategory::Nl
            | MinorCategory::No
    )
}

/// [`normalize`], optionally backed by a shared [`NormalizationCache`].
#[derive(Clone, Default)]
pub struct Normalizer {
    cache: Option<Arc<NormalizationCache>>,
}

impl Normalizer {
    /// A normalizer without a cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A normalizer that consults and populates `cache`.
    pub fn with_cache(cache: Arc<NormalizationCache>) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn cache(&self) -> Option<&Arc<NormalizationCache>> {
        self.cache.as_ref()
    }

    pub fn normalize(&self, input: &str) -> String {
        match &self.cache {
            Some(cache) => cache.get_or_insert_with(input, normalize),
            None => normalize(input),
        }
    }
}

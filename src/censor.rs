use crate::cache::NormalizationCache;
use crate::index::PatternIndex;
use crate::mtch::{MatchHit, Matcher};
use crate::normalize::{canonicalize, Normalizer};
use crate::{is_token_separator, Set};
use log::trace;
use std::iter;
use std::sync::Arc;

/// How detected words are mapped back onto the original text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MaskPolicy {
    /// Mask a whole token (a maximal run of non-separator characters, see
    /// [`crate::is_token_separator`]) when its normalized form is exactly one of the words that were
    /// detected anywhere in the text. Attached punctuation is part of the token, and is masked too.
    ///
    /// A word that is only detected across tokens, or inside a longer token, makes
    /// [`Censor::filter`] report a match but leaves the text unmasked.
    #[default]
    Token,
    /// Mask exactly the original characters that produced each detection, including repeated
    /// letters that were collapsed and punctuation in between, but never whitespace.
    Span,
}

/// Censor detects forbidden words in arbitrary text, and masks them.
///
/// It borrows the [`Matcher`] (usually a [`PatternIndex`]) it was created with, and can be shared
/// between threads as long as the matcher can.
///
/// ```
/// use wordmask::{Censor, PatternIndex};
///
/// let index = PatternIndex::from_words(["idiota", "burro"]);
/// let censor = Censor::new(&index);
///
/// assert_eq!(
///     censor.filter("Você é um IDIOTA, burrrrro"),
///     (true, String::from("Você é um ******* ********"))
/// );
/// assert_eq!(censor.filter("tudo bem?"), (false, String::from("tudo bem?")));
/// ```
pub struct Censor<'a, M: Matcher + ?Sized = PatternIndex> {
    matcher: &'a M,
    normalizer: Normalizer,
    censor_replacement: char,
    mask_policy: MaskPolicy,
}

impl<'a, M: Matcher + ?Sized> Censor<'a, M> {
    /// Creates a `Censor` backed by `matcher`, with default options.
    pub fn new(matcher: &'a M) -> Self {
        Self {
            matcher,
            normalizer: Normalizer::new(),
            censor_replacement: '*',
            mask_policy: MaskPolicy::default(),
        }
    }

    /// Sets the character used to mask detected words.
    ///
    /// The default is `'*'`.
    pub fn with_censor_replacement(&mut self, censor_replacement: char) -> &mut Self {
        self.censor_replacement = censor_replacement;
        self
    }

    /// Selects how detections are mapped back onto the original text.
    ///
    /// The default is [`MaskPolicy::Token`].
    pub fn with_mask_policy(&mut self, mask_policy: MaskPolicy) -> &mut Self {
        self.mask_policy = mask_policy;
        self
    }

    /// Memoizes normalization of whole inputs and tokens in `cache`, which may be shared with other
    /// `Censor`s.
    pub fn with_cache(&mut self, cache: Arc<NormalizationCache>) -> &mut Self {
        self.normalizer = Normalizer::with_cache(cache);
        self
    }

    pub fn mask_policy(&self) -> MaskPolicy {
        self.mask_policy
    }

    /// Returns `true` if `text` contains a forbidden word. Cheaper than [`Self::filter`], since
    /// nothing is masked.
    pub fn is_forbidden(&self, text: &str) -> bool {
        !text.is_empty() && self.matcher.is_match(&self.normalizer.normalize(text))
    }

    /// Returns whether `text` contains a forbidden word and a copy of `text` with detections
    /// masked.
    ///
    /// If nothing is detected, the copy is identical to `text`. Otherwise, only masked characters
    /// differ; everything else, including whitespace, is preserved exactly.
    pub fn filter(&self, text: &str) -> (bool, String) {
        if text.is_empty() {
            return (false, String::new());
        }

        let canonical = self.normalizer.normalize(text);
        let hits = self.matcher.find_all(&canonical);
        trace!("{} hits in {} canonical bytes", hits.len(), canonical.len());

        if hits.is_empty() {
            return (false, text.to_owned());
        }

        let censored = match self.mask_policy {
            MaskPolicy::Token => self.mask_tokens(text, &hits),
            MaskPolicy::Span => self.mask_spans(text, &hits),
        };
        (true, censored)
    }

    /// Like [`Self::filter`], but accepts text that may not be valid UTF-8. Invalid sequences
    /// become U+FFFD, which is never part of a word.
    pub fn filter_bytes(&self, bytes: &[u8]) -> (bool, String) {
        self.filter(&String::from_utf8_lossy(bytes))
    }

    fn mask_tokens(&self, text: &str, hits: &[MatchHit]) -> String {
        let matched: Set<&str> = hits
            .iter()
            .map(|hit| self.matcher.pattern(hit.pattern))
            .collect();

        let mut censored = String::with_capacity(text.len());
        let mut rest = text;
        while !rest.is_empty() {
            let token_len = rest.find(is_token_separator).unwrap_or(rest.len());
            let (token, tail) = rest.split_at(token_len);

            if !token.is_empty() {
                if matched.contains(self.normalizer.normalize(token).as_str()) {
                    let width = token.chars().count();
                    censored.extend(iter::repeat(self.censor_replacement).take(width));
                } else {
                    censored.push_str(token);
                }
            }

            let gap_len = tail
                .find(|c: char| !is_token_separator(c))
                .unwrap_or(tail.len());
            censored.push_str(&tail[..gap_len]);
            rest = &tail[gap_len..];
        }
        censored
    }

    fn mask_spans(&self, text: &str, hits: &[MatchHit]) -> String {
        let canonical = canonicalize(text);
        let mut masked = vec![false; text.chars().count()];

        for hit in hits {
            if hit.start >= hit.end {
                continue;
            }
            // Hits from a matcher that disagrees with our normalization are ignored.
            let first = canonical.get(hit.start);
            let last = canonical.get(hit.end - 1);
            if let (Some(first), Some(last)) = (first, last) {
                for m in &mut masked[first.first..=last.last] {
                    *m = true;
                }
            }
        }

        text.chars()
            .zip(masked)
            .map(|(c, m)| {
                if m && !is_token_separator(c) {
                    self.censor_replacement
                } else {
                    c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Censor, MaskPolicy};
    use crate::cache::NormalizationCache;
    use crate::index::PatternIndex;
    use crate::mtch::{MatchHit, Matcher, PatternId};
    use rand::prelude::ThreadRng;
    use rand::{thread_rng, Rng};
    use rayon::prelude::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn index() -> PatternIndex {
        PatternIndex::from_words(["idiota", "burro", "nazismo"])
    }

    #[test]
    fn empty() {
        let index = index();
        let censor = Censor::new(&index);
        assert_eq!(censor.filter(""), (false, String::new()));
        assert!(!censor.is_forbidden(""));
    }

    #[test]
    fn clean_passthrough() {
        let index = PatternIndex::from_words(["idiota"]);
        let censor = Censor::new(&index);
        assert_eq!(
            censor.filter("Olá, tudo bem?"),
            (false, String::from("Olá, tudo bem?"))
        );
        assert!(!censor.is_forbidden("Olá, tudo bem?"));
    }

    #[test]
    fn token_includes_punctuation() {
        let index = PatternIndex::from_words(["idiota"]);
        let censor = Censor::new(&index);

        let (matched, censored) = censor.filter("Você é um IDIOTA, sério");
        assert!(matched);
        assert_eq!(censored, "Você é um ******* sério");
        // The mask is as wide as the whole token, comma included.
        assert_eq!(censored.matches('*').count(), "IDIOTA,".chars().count());
    }

    #[test]
    fn token_gap() {
        let index = PatternIndex::from_words(["idiota", "nazismo"]);
        let censor = Censor::new(&index);

        // '!' reads as a leet 'i', so the token is "idiotai", which isn't a word.
        assert_eq!(
            censor.filter("Você é um IDIOTA!"),
            (true, String::from("Você é um IDIOTA!"))
        );
        // Embedded in a longer token.
        assert_eq!(
            censor.filter("movimento antinazismo"),
            (true, String::from("movimento antinazismo"))
        );
        // Split across tokens.
        assert_eq!(
            censor.filter("idi ota"),
            (true, String::from("idi ota"))
        );
    }

    #[test]
    fn span() {
        let index = PatternIndex::from_words(["idiota", "nazismo"]);
        let mut censor = Censor::new(&index);
        censor.with_mask_policy(MaskPolicy::Span);
        assert_eq!(censor.mask_policy(), MaskPolicy::Span);

        assert_eq!(
            censor.filter("Você é um IDIOTA!"),
            (true, String::from("Você é um ******!"))
        );
        assert_eq!(
            censor.filter("movimento antinazismo"),
            (true, String::from("movimento anti*******"))
        );
        assert_eq!(censor.filter("idi ota"), (true, String::from("*** ***")));
        assert_eq!(
            censor.filter("i.d.i.o.t.a"),
            (true, String::from("***********"))
        );
        assert_eq!(
            censor.filter("olá, tudo bem?"),
            (false, String::from("olá, tudo bem?"))
        );
    }

    #[test]
    fn span_collapsed_repeats() {
        let index = PatternIndex::from_words(["burro"]);
        let mut censor = Censor::new(&index);
        censor.with_mask_policy(MaskPolicy::Span);

        assert_eq!(
            censor.filter("seu BURRRRROOO!!"),
            (true, String::from("seu **********!!"))
        );
    }

    #[test]
    fn multiple_patterns() {
        let index = index();
        let censor = Censor::new(&index);
        assert_eq!(
            censor.filter("idiota e burro"),
            (true, String::from("****** e *****"))
        );
        assert_eq!(
            censor.filter("n4z1sm0 idiota burro idiota"),
            (true, String::from("******* ****** ***** ******"))
        );
    }

    #[test]
    fn obfuscation() {
        let index = index();
        let censor = Censor::new(&index);
        assert_eq!(
            censor.filter("seu burrrrroo"),
            (true, String::from("seu *********"))
        );
        assert_eq!(censor.filter("1D10T4"), (true, String::from("******")));
        assert_eq!(censor.filter("ìdíõtá"), (true, String::from("******")));
        assert_eq!(censor.filter("b.u.r.r.o"), (true, String::from("*********")));
    }

    #[test]
    fn whitespace_preserved() {
        let index = index();
        let censor = Censor::new(&index);
        assert_eq!(
            censor.filter("  idiota\t\tok\r\nburro \n"),
            (true, String::from("  ******\t\tok\r\n***** \n"))
        );
        // Other whitespace doesn't separate tokens.
        assert_eq!(
            censor.filter("idiota\u{a0}burro"),
            (true, String::from("idiota\u{a0}burro"))
        );
    }

    #[test]
    fn replacement() {
        let index = index();
        let mut censor = Censor::new(&index);
        censor.with_censor_replacement('#');
        assert_eq!(
            censor.filter("HELLO burro WORLD"),
            (true, String::from("HELLO ##### WORLD"))
        );
    }

    #[test]
    fn bytes() {
        let index = index();
        let censor = Censor::new(&index);
        assert_eq!(
            censor.filter_bytes(b"idiota \xff\xfe ok"),
            (true, String::from("****** \u{FFFD}\u{FFFD} ok"))
        );
        assert_eq!(censor.filter_bytes(b"\xc3"), (false, String::from("\u{FFFD}")));
    }

    #[test]
    fn cached() {
        let index = index();
        let cache = Arc::new(NormalizationCache::new());
        let mut censor = Censor::new(&index);
        censor.with_cache(Arc::clone(&cache));

        assert_eq!(
            censor.filter("idiota e burro"),
            (true, String::from("****** e *****"))
        );
        // The whole input and its three tokens.
        assert_eq!(cache.len(), 4);

        cache.clear();
        assert_eq!(
            censor.filter("idiota e burro"),
            (true, String::from("****** e *****"))
        );
    }

    /// Matches one pattern by plain substring search.
    struct Substring(String);

    impl Matcher for Substring {
        fn find_all(&self, canonical: &str) -> Vec<MatchHit> {
            canonical
                .match_indices(self.0.as_str())
                .map(|(byte, _)| {
                    let start = canonical[..byte].chars().count();
                    MatchHit {
                        pattern: 0,
                        start,
                        end: start + self.0.chars().count(),
                    }
                })
                .collect()
        }

        fn pattern(&self, _: PatternId) -> &str {
            &self.0
        }
    }

    #[test]
    fn other_matcher() {
        let matcher = Substring(String::from("buro"));
        let censor = Censor::new(&matcher);
        assert_eq!(
            censor.filter("não seja burro"),
            (true, String::from("não seja *****"))
        );

        let dyn_matcher: &dyn Matcher = &matcher;
        let mut censor = Censor::new(dyn_matcher);
        censor.with_mask_policy(MaskPolicy::Span);
        assert_eq!(censor.filter("burro"), (true, String::from("*****")));
    }

    #[test]
    fn unicode_abuse() {
        let index = index();
        let censor = Censor::new(&index);
        let mut span = Censor::new(&index);
        span.with_mask_policy(MaskPolicy::Span);
        let mut rng = thread_rng();

        fn random_string(rng: &mut ThreadRng, len: usize) -> String {
            rng.sample_iter::<char, _>(rand::distributions::Standard)
                .take(len)
                .collect()
        }

        for _ in 0..50 {
            let input = random_string(&mut rng, 100);
            for censor in [&censor, &span] {
                let (matched, censored) = censor.filter(&input);
                assert_eq!(censored.chars().count(), input.chars().count());
                if !matched {
                    assert_eq!(censored, input);
                }
            }
        }
    }

    #[test]
    fn concurrent() {
        let index = index();
        let cache = Arc::new(NormalizationCache::new());
        let mut censor = Censor::new(&index);
        censor.with_cache(cache);

        let inputs: Vec<String> = (0..1000)
            .map(|i| match i % 4 {
                0 => format!("mensagem {} sem nada", i),
                1 => format!("{} idiota {}", i, i),
                2 => String::from("burrrrro e n4z1smo"),
                _ => format!("Olá {}!", i),
            })
            .collect();

        let sequential: Vec<_> = inputs.iter().map(|input| censor.filter(input)).collect();
        let parallel: Vec<_> = inputs.par_iter().map(|input| censor.filter(input)).collect();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn bandwidth() {
        let index = index();
        let censor = Censor::new(&index);
        let text = "uma mensagem comum, com um idiota e um burrrro no meio. ".repeat(1000);

        for power in 4..16 {
            let len = 2usize.pow(power);
            let slice: String = text.chars().take(len).collect();

            let now = Instant::now();
            let _ = censor.filter(&slice);
            let elapsed = now.elapsed();

            println!(
                "{}, {}, {}",
                len,
                elapsed.as_secs_f32(),
                len as f32 / elapsed.as_secs_f32() / 1000.0 / 1000.0
            );
        }
    }
}

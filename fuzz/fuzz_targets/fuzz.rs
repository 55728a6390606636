#![no_main]
use lazy_static::lazy_static;
use libfuzzer_sys::fuzz_target;
use wordmask::{normalize, Censor, MaskPolicy, PatternIndex};

lazy_static! {
    static ref INDEX: PatternIndex =
        PatternIndex::from_words(["idiota", "burro", "nazismo", "otário", "a", "ab"]);
}

fuzz_target!(|data: &[u8]| {
    if !data.is_empty() {
        let flags = data[0];
        let input = &data[1..];

        let mut censor = Censor::new(&*INDEX);
        censor
            .with_mask_policy(if flag(flags, 0) {
                MaskPolicy::Span
            } else {
                MaskPolicy::Token
            })
            .with_censor_replacement(if flag(flags, 1) { '#' } else { '*' });

        let (matched, censored) = censor.filter_bytes(input);
        let text = String::from_utf8_lossy(input);
        assert_eq!(censored.chars().count(), text.chars().count());
        if !matched {
            assert_eq!(censored, text);
        }

        let once = normalize(&text);
        assert_eq!(normalize(&once), once);
    }
});

fn flag(flags: u8, index: u8) -> bool {
    ((flags >> index) & 1) == 1
}

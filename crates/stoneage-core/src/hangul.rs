//! Korean initial-consonant (초성) search.
//!
//! A precomposed Hangul syllable encodes its leading consonant as
//! `(code − 0xAC00) / 588`. Queries made only of compatibility jamo
//! consonants (`ㄱ`..=`ㅎ`) are matched against that sequence, so typing
//! `ㅎㅂㅌ` finds `헬비스트`.

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
/// Syllables per leading consonant (21 vowels × 28 finals).
const SYLLABLES_PER_INITIAL: u32 = 588;

const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

/// Leading consonant of a Hangul syllable; any other character is returned as is.
pub fn initial_consonant(ch: char) -> char {
    let code = ch as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return ch;
    }
    INITIALS[((code - SYLLABLE_BASE) / SYLLABLES_PER_INITIAL) as usize]
}

/// Map every syllable of `text` to its leading consonant.
pub fn initial_consonants(text: &str) -> String {
    text.chars().map(initial_consonant).collect()
}

fn is_consonant_jamo(ch: char) -> bool {
    ('ㄱ'..='ㅎ').contains(&ch)
}

/// True when `query` is non-empty and made only of consonant jamo.
pub fn is_consonant_query(query: &str) -> bool {
    !query.is_empty() && query.chars().all(is_consonant_jamo)
}

/// Whether the consonants of `query` appear, in order, among the leading
/// consonants of `candidate`. Gaps are allowed.
pub fn matches_initials(candidate: &str, query: &str) -> bool {
    let wanted = initial_consonants(query);
    let mut haystack = candidate.chars().map(initial_consonant);
    wanted
        .chars()
        .all(|needle| haystack.by_ref().any(|c| c == needle))
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(candidate: &str, query: &str) -> bool {
    candidate.to_lowercase().contains(&query.to_lowercase())
}

/// Search predicate used across the catalog.
///
/// An empty query matches everything; otherwise `candidate` matches when it
/// contains the query (ignoring case) or, for a consonant-only query, when
/// its initial consonants do.
pub fn matches(candidate: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    contains_ignore_case(candidate, query)
        || (is_consonant_query(query) && matches_initials(candidate, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_of_first_and_last_syllable() {
        assert_eq!(initial_consonant('가'), 'ㄱ');
        assert_eq!(initial_consonant('힣'), 'ㅎ');
    }

    #[test]
    fn non_syllables_pass_through() {
        assert_eq!(initial_consonant('a'), 'a');
        assert_eq!(initial_consonant('ㅎ'), 'ㅎ');
        assert_eq!(initial_consonant('('), '(');
    }

    #[test]
    fn initials_of_name() {
        assert_eq!(initial_consonants("헬비스트"), "ㅎㅂㅅㅌ");
        assert_eq!(initial_consonants("뽀로로(환)"), "ㅃㄹㄹ(ㅎ)");
    }

    #[test]
    fn consonant_query_detection() {
        assert!(is_consonant_query("ㅎㅂ"));
        assert!(is_consonant_query("ㄲ"));
        assert!(!is_consonant_query("ㅎ비"));
        assert!(!is_consonant_query("ㅏ"));
        assert!(!is_consonant_query(""));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("헬비스트", ""));
        assert!(matches("", ""));
        assert!(matches("anything", "   "));
    }

    #[test]
    fn consonant_query_may_skip_syllables() {
        assert!(matches("헬비스트", "ㅎㅂㅌ"));
        assert!(matches("헬비스트", "ㅂㅅ"));
        assert!(!matches("헬비스트", "ㅌㅎ"));
    }

    #[test]
    fn literal_match_ignores_case() {
        assert!(matches("Dragon King", "dragon"));
        assert!(matches("헬비스트", "비스"));
        assert!(!matches("헬비스트", "스비"));
    }

    #[test]
    fn mixed_query_does_not_use_initials() {
        assert!(!matches("헬비스트", "ㅎ비"));
    }
}

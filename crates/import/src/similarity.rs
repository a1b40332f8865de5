use crate::normalize::normalize;

/// Tokens shorter than this carry no signal ("of", "ca", store numbers like "12").
const MIN_TOKEN_LEN: usize = 3;

/// Decides whether two merchant strings name the same business.
///
/// Checks, in order: missing data never matches, exact normalized equality,
/// substring containment either way, then significant-word overlap of at
/// least half the shorter word list.
pub fn are_similar(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b || contains_either(&a, &b) {
        return true;
    }

    let words_a = significant_words(&a);
    let words_b = significant_words(&b);

    if words_a.is_empty() || words_b.is_empty() {
        return false;
    }

    let common = words_a.iter().filter(|w| words_b.contains(w)).count();
    common as f64 >= words_a.len().min(words_b.len()) as f64 * 0.5
}

/// Substring containment in either direction on already-normalized keys.
pub(crate) fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn significant_words(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|w| w.len() >= MIN_TOKEN_LEN)
        .collect()
}

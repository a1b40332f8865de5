/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Capitalizes every single-space separated word. Runs of spaces are kept
/// as-is, so the output has exactly the input's spacing.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title case with a list of words that stay lower-case ("the", "inc", ...).
pub fn title_case_with(text: &str, keep_lower: impl Fn(&str) -> bool) -> String {
    text.split(' ')
        .map(|word| {
            if keep_lower(word) {
                word.to_lowercase()
            } else {
                capitalize_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

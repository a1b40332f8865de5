/// Canonical lookup form of a merchant string: lower-case ASCII letters,
/// digits and inner whitespace only. Learning and matching must both go
/// through this function or lookups silently miss.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(normalize("STARBUCKS #4521"), "starbucks 4521");
        assert_eq!(normalize("A&W Canada"), "aw canada");
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(normalize("  Tim Hortons #123!"), normalize("tim hortons 123"));
    }

    #[test]
    fn trailing_punctuation_leaves_no_trailing_space() {
        assert_eq!(normalize("Costco !"), "costco");
    }

    #[test]
    fn idempotent() {
        for s in ["  Tim Hortons #123!", "Café Olé", "a !", "", "   ", "UBER* EATS  ", "7-ELEVEN"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(normalize("Café"), "caf");
    }

    #[test]
    fn empty_and_symbol_only_inputs_are_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("###"), "");
    }
}

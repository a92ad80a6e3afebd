use regex::Regex;

/// Best-effort repair for the completion service's inconsistent quoting.
///
/// Maps every single quote to a double quote, then restores double quotes
/// that sit directly between two word characters back to single quotes, so
/// contractions and possessives inside field values survive
/// (`it's` -> `it"s` -> `it's`).
///
/// This is a documented heuristic, not a general JSON sanitizer: it is lossy
/// for values that legitimately contain double quotes, and it does not handle
/// nested escaped quotes. Callers depend on the current behavior, so keep it
/// as is.
pub fn repair_quotes(raw: &str) -> String {
    let doubled = raw.replace('\'', "\"");
    let re = Regex::new(r#"(\w)"(\w)"#).unwrap();
    re.replace_all(&doubled, "$1'$2").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quoted_json_becomes_parseable() {
        let raw = "{'summary': 'a short summary'}";
        let repaired = repair_quotes(raw);

        assert_eq!(repaired, r#"{"summary": "a short summary"}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn test_contractions_survive() {
        let raw = "{'answer': 'it's a closure'}";
        let repaired = repair_quotes(raw);

        assert_eq!(repaired, r#"{"answer": "it's a closure"}"#);
    }

    #[test]
    fn test_idempotent_on_repaired_input() {
        let raw = "{'question': 'what's Rust's borrow checker?'}";
        let once = repair_quotes(raw);
        let twice = repair_quotes(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_already_valid_json_untouched() {
        let raw = r#"{"title": "Intro to Rust"}"#;
        assert_eq!(repair_quotes(raw), raw);
    }
}
